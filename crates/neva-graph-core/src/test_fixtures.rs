//! Minimal fixtures for graph and highlight tests.
//!
//! Provides isolated, in-memory snapshots and entity models without
//! filesystem or external dependencies.

use crate::entity::{
    Component, Connection, Entity, EntityKind, EntityModel, EntityRef, Instance, Io, PortAddr,
    SenderSide,
};
use crate::graph::{EdgeKind, Graph, GraphEdge, GraphNode, NodeData};

/// Builder for hand-written graph snapshots.
#[derive(Default)]
pub struct TestGraphBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl TestGraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node of the given kind whose id doubles as its name.
    pub fn add_node(&mut self, id: &str, kind: EntityKind) -> &mut Self {
        self.nodes.push(GraphNode::new(
            id,
            kind,
            NodeData::Declaration {
                package: "main".to_string(),
                name: id.to_string(),
                exported: false,
            },
        ));
        self
    }

    pub fn add_component(&mut self, id: &str) -> &mut Self {
        self.add_node(id, EntityKind::Component)
    }

    /// Add a net edge; ids are assigned sequentially as `e0`, `e1`, ...
    pub fn add_edge(&mut self, source: &str, target: &str) -> &mut Self {
        let id = format!("e{}", self.edges.len());
        self.edges
            .push(GraphEdge::new(id, source, target, EdgeKind::Net));
        self
    }

    pub fn build(&self) -> Graph {
        Graph {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Component nodes linked in order: `ids[0] -> ids[1] -> ...`.
    pub fn chain(ids: &[&str]) -> Graph {
        let mut builder = Self::new();
        for id in ids {
            builder.add_component(id);
        }
        for pair in ids.windows(2) {
            builder.add_edge(pair[0], pair[1]);
        }
        builder.build()
    }
}

/// A two-package program: `main.Main` wires a `std.Printer` instance and a
/// local `Greeter` instance, and uses a const sender.
///
/// ```text
/// main/Main ── in:start ──▶ main/Main/greeter ──▶ main/Main/printer ──▶ main/Main (out:stop)
/// main/Greeting (const) ──▶ main/Main/greeter
/// ```
pub fn sample_model() -> EntityModel {
    let mut main = Component::default();
    main.interface.io.inports.insert("start".into(), "any".into());
    main.interface.io.outports.insert("stop".into(), "any".into());
    main.nodes.insert(
        "greeter".into(),
        Instance {
            entity_ref: EntityRef::local("Greeter"),
        },
    );
    main.nodes.insert(
        "printer".into(),
        Instance {
            entity_ref: EntityRef::qualified("std", "Printer"),
        },
    );
    main.net = vec![
        Connection {
            sender: SenderSide::Port(PortAddr::new("in", "start")),
            receivers: vec![PortAddr::new("greeter", "sig")],
        },
        Connection {
            sender: SenderSide::Const(EntityRef::local("Greeting")),
            receivers: vec![PortAddr::new("greeter", "text")],
        },
        Connection {
            sender: SenderSide::Port(PortAddr::new("greeter", "msg")),
            receivers: vec![PortAddr::new("printer", "data")],
        },
        Connection {
            sender: SenderSide::Port(PortAddr::new("printer", "sig")),
            receivers: vec![PortAddr::new("out", "stop")],
        },
    ];

    let mut printer_io = Io::default();
    printer_io.inports.insert("data".into(), "any".into());
    printer_io.outports.insert("sig".into(), "any".into());

    EntityModel::new()
        .with_entity("main", "Main", Entity::component(main).exported())
        .with_entity("main", "Greeter", Entity::component(Component::default()))
        .with_entity("main", "Greeting", Entity::constant("\"hello\""))
        .with_entity("main", "Message", Entity::type_def("string"))
        .with_entity("std", "Printer", Entity::interface(printer_io).exported())
}
