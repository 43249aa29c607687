//! Contract of the external drawing surface.

use std::sync::Arc;

use neva_graph_core::Graph;

use crate::renderer::RendererRegistry;

/// A surface that draws snapshots (pan, zoom, minimap, node visuals).
///
/// The surface reports pointer activity back by calling
/// [`GraphController::on_node_hover_enter`](crate::GraphController::on_node_hover_enter)
/// and [`GraphController::on_node_hover_leave`](crate::GraphController::on_node_hover_leave).
pub trait GraphView {
    fn render(&mut self, graph: &Arc<Graph>, renderers: &RendererRegistry);
}
