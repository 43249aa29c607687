//! End-to-end tests: entity model JSON -> graph -> hover transitions.

use std::collections::HashSet;
use std::sync::Arc;

use neva_graph_core::test_fixtures::{sample_model, TestGraphBuilder};
use neva_graph_core::{
    EntityKind, EntityModel, Graph, GraphBuilder, HighlightEngine, HoverEvent, NodeDisplay,
    NodeId,
};

fn highlighted_nodes(graph: &Graph) -> HashSet<&str> {
    graph
        .nodes
        .iter()
        .filter(|n| n.is_highlighted())
        .map(|n| n.id.as_str())
        .collect()
}

fn highlighted_edges(graph: &Graph) -> HashSet<(&str, &str)> {
    graph
        .edges
        .iter()
        .filter(|e| e.highlighted)
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect()
}

#[test]
fn every_built_edge_has_both_endpoints() {
    let graph = GraphBuilder::build(&sample_model()).graph;
    let ids: HashSet<_> = graph.nodes.iter().map(|n| &n.id).collect();

    for edge in &graph.edges {
        assert!(ids.contains(&edge.source), "dangling source in {}", edge.id);
        assert!(ids.contains(&edge.target), "dangling target in {}", edge.id);
    }
}

#[test]
fn hovering_middle_of_chain() {
    let engine = HighlightEngine::new();
    let graph = Arc::new(TestGraphBuilder::chain(&["A", "B", "C"]));

    let next = engine.on_enter(&NodeId::from("B"), &graph);

    assert_eq!(highlighted_nodes(&next), HashSet::from(["A", "C"]));
    assert!(next.node(&NodeId::from("B")).unwrap().is_dimmed());
    assert_eq!(
        highlighted_edges(&next),
        HashSet::from([("A", "B"), ("B", "C")])
    );
    for node in &next.nodes {
        assert!(!(node.is_highlighted() && node.is_dimmed()));
    }
}

#[test]
fn hovering_a_component_of_a_built_program() {
    let engine = HighlightEngine::new();
    let graph = Arc::new(GraphBuilder::build(&sample_model()).graph);

    let next = engine.on_enter(&NodeId::from("main/Main"), &graph);

    assert_eq!(
        highlighted_nodes(&next),
        HashSet::from(["main/Main/greeter", "main/Main/printer"])
    );
    assert_eq!(
        highlighted_edges(&next),
        HashSet::from([
            ("main/Main", "main/Main/greeter"),
            ("main/Main/printer", "main/Main"),
        ])
    );
    let dimmed: HashSet<_> = next
        .nodes
        .iter()
        .filter(|n| n.display == NodeDisplay::Dimmed)
        .map(|n| n.id.as_str())
        .collect();
    assert!(dimmed.contains("main/Main"));
    assert!(dimmed.contains("std/Printer"));
    assert_eq!(dimmed.len(), 5);
}

#[test]
fn hovering_an_instance_changes_nothing() {
    let engine = HighlightEngine::new();
    let graph = Arc::new(GraphBuilder::build(&sample_model()).graph);

    let next = engine.on_enter(&NodeId::from("main/Main/printer"), &graph);

    assert!(Arc::ptr_eq(&graph, &next));
    assert_eq!(
        graph.node(&NodeId::from("main/Main/printer")).unwrap().kind,
        EntityKind::Node
    );
}

#[test]
fn leave_after_any_sequence_is_fully_neutral() {
    let engine = HighlightEngine::new();
    let mut current = Arc::new(GraphBuilder::build(&sample_model()).graph);

    let events = [
        HoverEvent::Enter(NodeId::from("main/Main")),
        HoverEvent::Enter(NodeId::from("main/Greeter")),
        HoverEvent::Leave,
        HoverEvent::Enter(NodeId::from("main/Greeter")),
        HoverEvent::Enter(NodeId::from("main/Message")),
        HoverEvent::Leave,
        HoverEvent::Leave,
    ];
    for event in &events {
        current = engine.apply(event, &current);
        assert_eq!(current.node_count(), 7);
        assert_eq!(current.edge_count(), 6);
    }

    assert!(current.is_neutral());
}

#[test]
fn model_json_round_trip_builds_same_graph() {
    let model = sample_model();
    let json = serde_json::to_string(&model).unwrap();
    let parsed = EntityModel::from_json(&json).unwrap();

    assert_eq!(parsed, model);
    assert_eq!(GraphBuilder::build(&parsed).graph, GraphBuilder::build(&model).graph);
}
