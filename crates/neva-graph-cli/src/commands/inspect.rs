//! Inspect command: human-readable listing of the built graph.

use std::path::Path;

use anyhow::Result;
use neva_graph_core::{Graph, GraphBuilder};
use neva_graph_view::RendererRegistry;

use super::{load_model, report_diagnostics};

pub fn execute(model_path: &Path) -> Result<()> {
    let model = load_model(model_path)?;
    let built = GraphBuilder::build(&model);
    report_diagnostics(&built.diagnostics);
    print!("{}", render_listing(&built.graph, &RendererRegistry::new()));
    Ok(())
}

fn render_listing(graph: &Graph, renderers: &RendererRegistry) -> String {
    let mut out = String::new();

    out.push_str(&format!("Nodes ({})\n", graph.node_count()));
    for node in &graph.nodes {
        out.push_str(&format!(
            "  {:<10} {:<10} {}  {}\n",
            node.kind.label(),
            format!("{:?}", renderers.node_renderer(node.kind)),
            node.id,
            node.label()
        ));
    }

    out.push_str(&format!("Edges ({})\n", graph.edge_count()));
    for edge in &graph.edges {
        out.push_str(&format!(
            "  {:<12} {} -> {}\n",
            edge.kind.to_string(),
            edge.source,
            edge.target
        ));
    }

    let unconnected = graph.unconnected_nodes();
    if !unconnected.is_empty() {
        let ids: Vec<&str> = unconnected.iter().map(|id| id.as_str()).collect();
        out.push_str(&format!("Unconnected: {}\n", ids.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use neva_graph_core::test_fixtures::sample_model;

    #[test]
    fn listing_covers_nodes_and_edges() {
        let graph = GraphBuilder::build(&sample_model()).graph;
        let listing = render_listing(&graph, &RendererRegistry::new());

        assert!(listing.starts_with("Nodes (7)\n"));
        assert!(listing.contains("Edges (6)\n"));
        assert!(listing.contains("main/Main/greeter -> main/Main/printer"));
        assert!(listing.contains("printer: std.Printer"));
        assert!(listing.ends_with("Unconnected: main/Message\n"));
    }
}
