//! Kind-to-renderer dispatch.

use neva_graph_core::{EdgeKind, EntityKind};
use serde::Serialize;

/// Presentation handler for a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRenderer {
    /// Box with inports and outports. Shared by components and interfaces.
    Interface,
    Type,
    Const,
    /// Instantiated node inside a component.
    Instance,
    /// Connection record drawn as a node (only when a host chooses to).
    Net,
}

/// Presentation handler for an edge kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeRenderer {
    Normal,
    Dashed,
}

/// Maps every node and edge kind to its renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RendererRegistry;

impl RendererRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Components and interfaces look the same on the canvas.
    pub fn node_renderer(&self, kind: EntityKind) -> NodeRenderer {
        match kind {
            EntityKind::Component | EntityKind::Interface => NodeRenderer::Interface,
            EntityKind::Type => NodeRenderer::Type,
            EntityKind::Const => NodeRenderer::Const,
            EntityKind::Node => NodeRenderer::Instance,
            EntityKind::Net => NodeRenderer::Net,
        }
    }

    pub fn edge_renderer(&self, kind: EdgeKind) -> EdgeRenderer {
        match kind {
            EdgeKind::Net => EdgeRenderer::Normal,
            EdgeKind::Instantiates => EdgeRenderer::Dashed,
        }
    }

    /// The full node mapping, one entry per kind.
    pub fn node_table(&self) -> Vec<(EntityKind, NodeRenderer)> {
        EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, self.node_renderer(kind)))
            .collect()
    }
}
