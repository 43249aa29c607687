//! Single owner of the diagram state.
//!
//! The controller threads the current snapshot through the highlight engine
//! and the layout session. Views never hold mutable state of their own; they
//! render whatever [`GraphController::snapshot`] returns.

use std::sync::Arc;
use std::time::Duration;

use neva_graph_core::{
    BuildDiagnostic, EntityModel, Graph, GraphBuilder, HighlightEngine, HighlightPolicy,
    HoverEvent, NodeId,
};
use neva_graph_layout::{
    LayoutOutcome, LayoutProvider, LayoutResult, LayoutSession, LayoutStatus, LayoutTicket,
};
use tracing::{debug, info};

use crate::renderer::RendererRegistry;
use crate::view::GraphView;

#[derive(Debug, Default)]
pub struct GraphController {
    engine: HighlightEngine,
    layout: LayoutSession,
    renderers: RendererRegistry,
    /// Latest build output, before layout.
    built: Arc<Graph>,
    diagnostics: Vec<BuildDiagnostic>,
    /// Snapshot handed to the view last time, for change detection.
    last_rendered: Option<Arc<Graph>>,
}

impl GraphController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: HighlightPolicy) -> Self {
        Self {
            engine: HighlightEngine::with_policy(policy),
            ..Self::default()
        }
    }

    /// Snapshot the view should draw.
    pub fn snapshot(&self) -> &Arc<Graph> {
        self.layout.snapshot()
    }

    /// Unpositioned graph of the current entity model.
    pub fn built_graph(&self) -> &Arc<Graph> {
        &self.built
    }

    pub fn diagnostics(&self) -> &[BuildDiagnostic] {
        &self.diagnostics
    }

    pub fn layout_status(&self) -> &LayoutStatus {
        self.layout.status()
    }

    pub fn renderers(&self) -> &RendererRegistry {
        &self.renderers
    }

    /// Discard everything derived from the previous model and build anew.
    /// The view shows an empty graph until the next layout resolves.
    pub fn rebuild(&mut self, model: &EntityModel) -> &[BuildDiagnostic] {
        let output = GraphBuilder::build(model);
        info!(
            nodes = output.graph.node_count(),
            edges = output.graph.edge_count(),
            diagnostics = output.diagnostics.len(),
            "Rebuilt diagram"
        );
        self.built = Arc::new(output.graph);
        self.diagnostics = output.diagnostics;
        self.layout.reset();
        &self.diagnostics
    }

    /// Start a layout request for the current build.
    ///
    /// The returned graph is owned, so the provider can be awaited without
    /// borrowing the controller.
    pub fn begin_layout(&mut self) -> (LayoutTicket, Arc<Graph>) {
        (self.layout.begin(), Arc::clone(&self.built))
    }

    pub fn complete_layout(
        &mut self,
        ticket: LayoutTicket,
        result: LayoutResult<Graph>,
    ) -> LayoutOutcome {
        self.layout.complete(ticket, result)
    }

    /// Request, await and apply a layout of the current build.
    pub async fn refresh_layout<P>(&mut self, provider: &P, timeout: Option<Duration>) -> LayoutOutcome
    where
        P: LayoutProvider + ?Sized,
    {
        let built = Arc::clone(&self.built);
        self.layout.run(provider, &built, timeout).await
    }

    /// Pointer entered `node`. Returns whether the snapshot changed.
    pub fn on_node_hover_enter(&mut self, node: &NodeId) -> bool {
        self.handle(HoverEvent::Enter(node.clone()))
    }

    /// Pointer left the hovered node. Returns whether the snapshot changed.
    pub fn on_node_hover_leave(&mut self) -> bool {
        self.handle(HoverEvent::Leave)
    }

    pub fn handle(&mut self, event: HoverEvent) -> bool {
        let current = self.layout.snapshot();
        let next = self.engine.apply(&event, current);
        let changed = !Arc::ptr_eq(current, &next);
        if changed {
            debug!(?event, "Snapshot updated");
            self.layout.replace_snapshot(next);
        }
        changed
    }

    /// Hand the snapshot to `view` unless it already drew this exact one.
    /// Returns whether a render happened.
    pub fn render<V>(&mut self, view: &mut V) -> bool
    where
        V: GraphView + ?Sized,
    {
        let current = self.layout.snapshot();
        if let Some(last) = &self.last_rendered {
            if Arc::ptr_eq(last, current) {
                return false;
            }
        }

        view.render(current, &self.renderers);
        self.last_rendered = Some(Arc::clone(current));
        true
    }
}
