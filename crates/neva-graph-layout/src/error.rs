//! Error types for layout operations.

use std::path::PathBuf;
use std::time::Duration;

use neva_graph_core::{GraphError, NodeId};
use thiserror::Error;

/// Errors that can occur while resolving a layout.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The provider did not answer in time.
    #[error("layout timed out after {after:?}")]
    Timeout { after: Duration },

    /// The provider has no coordinates for a node of the graph.
    #[error("no position for node {node}")]
    MissingPosition { node: NodeId },

    /// The provider returned a snapshot that breaks the graph invariants.
    #[error("invalid layout snapshot: {0}")]
    InvalidSnapshot(#[from] GraphError),

    /// Failed to read a positions file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Positions JSON could not be parsed.
    #[error("invalid positions json: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific failure.
    #[error("layout provider failed: {0}")]
    Provider(String),
}
