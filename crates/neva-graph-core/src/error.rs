//! Error types for the graph model.

use thiserror::Error;

use crate::graph::{EdgeId, NodeId};

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised when a graph or entity model is malformed.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Two nodes in one snapshot share the same id.
    #[error("duplicate node id: {id}")]
    DuplicateNode { id: NodeId },

    /// Two edges in one snapshot share the same id.
    #[error("duplicate edge id: {id}")]
    DuplicateEdge { id: EdgeId },

    /// An edge points at a node that is not part of the snapshot.
    #[error("edge {edge} references missing node {endpoint}")]
    DanglingEdge { edge: EdgeId, endpoint: NodeId },

    /// A kind name that is not part of the closed kind set.
    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),

    /// Entity model or snapshot (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
