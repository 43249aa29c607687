//! Hover command: lay out, simulate pointer events, print the snapshot.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use neva_graph_core::{Graph, NodeId};
use neva_graph_layout::{LayoutOutcome, LayoutProvider, PassthroughLayout, StaticLayout};
use neva_graph_view::GraphController;
use tracing::{info, warn};

use super::{emit_graph, load_model, report_diagnostics};
use crate::config::Config;

/// Options of a single hover simulation.
pub struct HoverArgs<'a> {
    pub model: &'a Path,
    pub node: &'a str,
    pub positions: Option<&'a Path>,
    pub leave: bool,
}

pub async fn execute(config: &Config, args: HoverArgs<'_>) -> Result<Arc<Graph>> {
    let model = load_model(args.model)?;
    let mut controller = GraphController::with_policy(config.highlight_policy());
    report_diagnostics(controller.rebuild(&model));

    let provider: Box<dyn LayoutProvider> = match args.positions {
        Some(path) => Box::new(StaticLayout::from_json_file(path)?),
        None => Box::new(PassthroughLayout),
    };
    let outcome = controller
        .refresh_layout(provider.as_ref(), config.layout_timeout())
        .await;
    if outcome != LayoutOutcome::Applied {
        bail!("Layout {}", controller.layout_status());
    }

    let hovered = NodeId::from(args.node);
    if controller.snapshot().node(&hovered).is_none() {
        warn!(node = %hovered, "Hovered node is not in the graph");
    }
    let changed = controller.on_node_hover_enter(&hovered);
    info!(node = %hovered, changed, "Hover enter");

    if args.leave {
        let changed = controller.on_node_hover_leave();
        info!(changed, "Hover leave");
    }

    let snapshot = Arc::clone(controller.snapshot());
    emit_graph(&snapshot, None)?;
    Ok(snapshot)
}
