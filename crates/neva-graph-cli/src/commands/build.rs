//! Build command: entity model to unpositioned graph JSON.

use std::path::Path;

use anyhow::Result;
use neva_graph_core::{BuildOutput, GraphBuilder};
use tracing::info;

use super::{emit_graph, load_model, report_diagnostics};

pub fn execute(model_path: &Path, output: Option<&Path>) -> Result<BuildOutput> {
    let model = load_model(model_path)?;
    let built = GraphBuilder::build(&model);
    info!(
        entities = model.entity_count(),
        nodes = built.graph.node_count(),
        edges = built.graph.edge_count(),
        "Built graph"
    );

    report_diagnostics(&built.diagnostics);
    emit_graph(&built.graph, output)?;
    Ok(built)
}
