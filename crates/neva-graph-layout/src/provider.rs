//! Layout provider contract and the built-in providers.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use neva_graph_core::{Graph, NodeId, Position};
use tracing::{debug, info};

use crate::{LayoutError, LayoutResult};

/// Computes node positions for a graph.
///
/// Implementations return a complete snapshot containing every node and edge
/// of the input. The caller replaces its current snapshot wholesale; no
/// partial merge of positions ever happens.
#[async_trait]
pub trait LayoutProvider: Send + Sync {
    async fn layout(&self, graph: &Graph) -> LayoutResult<Graph>;
}

/// Run `provider` on `graph`, bounded by `timeout` when given.
///
/// The returned snapshot is validated and has all display flags reset.
pub async fn resolve<P>(
    provider: &P,
    graph: &Graph,
    timeout: Option<Duration>,
) -> LayoutResult<Graph>
where
    P: LayoutProvider + ?Sized,
{
    let positioned = match timeout {
        Some(after) => tokio::time::timeout(after, provider.layout(graph))
            .await
            .map_err(|_| LayoutError::Timeout { after })??,
        None => provider.layout(graph).await?,
    };

    positioned.validate()?;
    debug!(nodes = positioned.node_count(), "Layout resolved");
    Ok(positioned.into_neutral())
}

/// Applies coordinates computed ahead of time.
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    positions: HashMap<NodeId, Position>,
}

impl StaticLayout {
    pub fn new(positions: HashMap<NodeId, Position>) -> Self {
        Self { positions }
    }

    /// Parse a `{ "<node id>": { "x": .., "y": .. } }` map.
    pub fn from_json_str(json: &str) -> LayoutResult<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Load positions written by an external layout tool.
    pub fn from_json_file(path: &Path) -> LayoutResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| LayoutError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let layout = Self::from_json_str(&contents)?;
        info!(
            path = %path.display(),
            positions = layout.positions.len(),
            "Loaded static layout"
        );
        Ok(layout)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[async_trait]
impl LayoutProvider for StaticLayout {
    async fn layout(&self, graph: &Graph) -> LayoutResult<Graph> {
        let mut positioned = graph.clone();
        for node in &mut positioned.nodes {
            let position = self
                .positions
                .get(&node.id)
                .copied()
                .ok_or_else(|| LayoutError::MissingPosition {
                    node: node.id.clone(),
                })?;
            node.position = Some(position);
        }
        Ok(positioned)
    }
}

/// Hands the graph back unchanged, leaving positions to the drawing surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughLayout;

#[async_trait]
impl LayoutProvider for PassthroughLayout {
    async fn layout(&self, graph: &Graph) -> LayoutResult<Graph> {
        Ok(graph.clone())
    }
}
