//! Maps an [`EntityModel`] to an unpositioned [`Graph`].
//!
//! Node ids are structural paths (`pkg/Entity`, `pkg/Component/node`), so
//! rebuilding the same model yields the same ids. References that cannot be
//! resolved never abort the build: the affected edge is dropped and a
//! [`BuildDiagnostic`] is recorded instead.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::entity::{Component, EntityKind, EntityModel, EntityRef, PortAddr, SenderSide};
use crate::graph::{EdgeId, EdgeKind, Graph, GraphEdge, GraphNode, NodeData, NodeId};

/// Category of a recoverable build problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An instance refers to an entity that is not in the model.
    UnresolvedEntityRef,
    /// A net endpoint names a node the component does not declare.
    UnknownNetNode,
    /// A const sender refers to something that is not a known const.
    UnresolvedConst,
    /// Two entities map to the same structural path.
    DuplicateNode,
    /// Two edges map to the same structural path.
    DuplicateEdge,
    /// An edge endpoint is not a node of the graph being built.
    DanglingEndpoint,
}

/// A recoverable problem found while building; the graph is still usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDiagnostic {
    pub kind: DiagnosticKind,
    /// Structural path of the entity or edge affected.
    pub path: String,
    pub message: String,
}

/// Result of a build: the graph plus everything that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub graph: Graph,
    pub diagnostics: Vec<BuildDiagnostic>,
}

impl BuildOutput {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Builder for constructing a [`Graph`] from an entity model.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_ids: HashSet<NodeId>,
    edge_ids: HashSet<EdgeId>,
    /// Entities whose path was already taken, as `(pkg, name)`.
    shadowed_entities: HashSet<(String, String)>,
    /// Instances whose path was already taken, as `(pkg, component, node)`.
    shadowed_instances: HashSet<(String, String, String)>,
    diagnostics: Vec<BuildDiagnostic>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for `model` in two passes: every node first, then
    /// every edge, so edges can only ever point at nodes of this build.
    pub fn build(model: &EntityModel) -> BuildOutput {
        let mut builder = Self::new();

        for (pkg, package) in &model.packages {
            for (name, entity) in &package.entities {
                let id = entity_node_id(pkg, name);
                let added = builder.add_node(GraphNode::new(
                    id,
                    entity.kind(),
                    NodeData::Declaration {
                        package: pkg.clone(),
                        name: name.clone(),
                        exported: entity.exported,
                    },
                ));

                if !added {
                    builder
                        .shadowed_entities
                        .insert((pkg.clone(), name.clone()));
                    continue;
                }

                if let Some(component) = entity.as_component() {
                    for (node_name, instance) in &component.nodes {
                        let added = builder.add_node(GraphNode::new(
                            instance_node_id(pkg, name, node_name),
                            EntityKind::Node,
                            NodeData::Instance {
                                component: name.clone(),
                                name: node_name.clone(),
                                entity_ref: instance.entity_ref.clone(),
                            },
                        ));
                        if !added {
                            builder.shadowed_instances.insert((
                                pkg.clone(),
                                name.clone(),
                                node_name.clone(),
                            ));
                        }
                    }
                }
            }
        }

        for (pkg, package) in &model.packages {
            for (name, entity) in &package.entities {
                if builder.is_shadowed(pkg, name) {
                    continue;
                }
                if let Some(component) = entity.as_component() {
                    builder.add_instantiation_edges(model, pkg, name, component);
                    builder.add_net_edges(model, pkg, name, component);
                }
            }
        }

        debug!(
            nodes = builder.nodes.len(),
            edges = builder.edges.len(),
            diagnostics = builder.diagnostics.len(),
            "Built entity graph"
        );

        builder.finish()
    }

    /// Get the current node count.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the current edge count.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Add a node unless its id is already taken. Returns whether it was added.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if !self.node_ids.insert(node.id.clone()) {
            self.report(
                DiagnosticKind::DuplicateNode,
                node.id.as_str(),
                format!("node id {} already exists; entity skipped", node.id),
            );
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Add an edge if its id is free and both endpoints exist. Returns
    /// whether it was added.
    pub fn add_edge(
        &mut self,
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
    ) -> bool {
        if self.edge_ids.contains(&id) {
            self.report(
                DiagnosticKind::DuplicateEdge,
                id.as_str(),
                format!("edge id {id} already exists; edge skipped"),
            );
            return false;
        }
        for endpoint in [&source, &target] {
            if !self.node_ids.contains(endpoint) {
                self.report(
                    DiagnosticKind::DanglingEndpoint,
                    id.as_str(),
                    format!("edge endpoint {endpoint} is not a node of this graph"),
                );
                return false;
            }
        }
        self.edge_ids.insert(id.clone());
        self.edges.push(GraphEdge::new(id, source, target, kind));
        true
    }

    /// Build the final output.
    pub fn finish(self) -> BuildOutput {
        BuildOutput {
            graph: Graph {
                nodes: self.nodes,
                edges: self.edges,
            },
            diagnostics: self.diagnostics,
        }
    }

    fn add_instantiation_edges(
        &mut self,
        model: &EntityModel,
        pkg: &str,
        component_name: &str,
        component: &Component,
    ) {
        for (node_name, instance) in &component.nodes {
            if self.is_shadowed_instance(pkg, component_name, node_name) {
                continue;
            }
            let instance_id = instance_node_id(pkg, component_name, node_name);
            let Some(target) = self.resolve_entity(model, &instance.entity_ref, pkg) else {
                self.report(
                    DiagnosticKind::UnresolvedEntityRef,
                    instance_id.as_str(),
                    format!("cannot resolve entity {}", instance.entity_ref),
                );
                continue;
            };

            let edge_id = EdgeId(format!("{instance_id}/instantiates"));
            self.add_edge(edge_id, instance_id, target, EdgeKind::Instantiates);
        }
    }

    fn add_net_edges(
        &mut self,
        model: &EntityModel,
        pkg: &str,
        component_name: &str,
        component: &Component,
    ) {
        let component_id = entity_node_id(pkg, component_name);

        for (conn_idx, connection) in component.net.iter().enumerate() {
            let sender = match &connection.sender {
                SenderSide::Port(addr) => {
                    self.resolve_port(pkg, component_name, component, addr, &component_id)
                }
                SenderSide::Const(entity_ref) => self.resolve_const(model, pkg, entity_ref),
            };
            let Some(sender) = sender else {
                continue;
            };

            for (recv_idx, receiver) in connection.receivers.iter().enumerate() {
                let Some(target) =
                    self.resolve_port(pkg, component_name, component, receiver, &component_id)
                else {
                    continue;
                };

                let edge_id = EdgeId(format!("{component_id}/net/{conn_idx}/{recv_idx}"));
                self.add_edge(edge_id, sender.clone(), target, EdgeKind::Net);
            }
        }
    }

    /// Map a port address to the node that owns the port.
    fn resolve_port(
        &mut self,
        pkg: &str,
        component_name: &str,
        component: &Component,
        addr: &PortAddr,
        component_id: &NodeId,
    ) -> Option<NodeId> {
        if addr.is_self() {
            return Some(component_id.clone());
        }

        if self.is_shadowed_instance(pkg, component_name, &addr.node) {
            self.report(
                DiagnosticKind::UnknownNetNode,
                component_id.as_str(),
                format!("net endpoint {addr} is shadowed by another node"),
            );
            return None;
        }
        if component.nodes.contains_key(&addr.node) {
            return Some(instance_node_id(pkg, component_name, &addr.node));
        }

        self.report(
            DiagnosticKind::UnknownNetNode,
            component_id.as_str(),
            format!("net refers to undeclared node {addr}"),
        );
        None
    }

    fn resolve_const(
        &mut self,
        model: &EntityModel,
        pkg: &str,
        entity_ref: &EntityRef,
    ) -> Option<NodeId> {
        match model.resolve(entity_ref, pkg) {
            Some((owner, entity))
                if entity.kind() == EntityKind::Const
                    && !self.is_shadowed(owner, &entity_ref.name) =>
            {
                Some(entity_node_id(owner, &entity_ref.name))
            }
            _ => {
                self.report(
                    DiagnosticKind::UnresolvedConst,
                    pkg,
                    format!("cannot resolve const {entity_ref}"),
                );
                None
            }
        }
    }

    /// Node of the entity `entity_ref` names, unless its path was taken by
    /// another entity.
    fn resolve_entity(
        &self,
        model: &EntityModel,
        entity_ref: &EntityRef,
        pkg: &str,
    ) -> Option<NodeId> {
        model
            .resolve(entity_ref, pkg)
            .filter(|(owner, _)| !self.is_shadowed(owner, &entity_ref.name))
            .map(|(owner, _)| entity_node_id(owner, &entity_ref.name))
    }

    fn is_shadowed(&self, pkg: &str, name: &str) -> bool {
        self.shadowed_entities
            .contains(&(pkg.to_string(), name.to_string()))
    }

    fn is_shadowed_instance(&self, pkg: &str, component: &str, node: &str) -> bool {
        self.shadowed_instances
            .contains(&(pkg.to_string(), component.to_string(), node.to_string()))
    }

    fn report(&mut self, kind: DiagnosticKind, path: &str, message: String) {
        warn!(path, ?kind, "{message}");
        self.diagnostics.push(BuildDiagnostic {
            kind,
            path: path.to_string(),
            message,
        });
    }
}

/// Node id of a package-level entity.
pub(crate) fn entity_node_id(pkg: &str, name: &str) -> NodeId {
    NodeId(format!("{pkg}/{name}"))
}

/// Node id of a node instantiated inside a component.
pub(crate) fn instance_node_id(pkg: &str, component: &str, node: &str) -> NodeId {
    NodeId(format!("{pkg}/{component}/{node}"))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Connection, Entity, Instance};
    use crate::test_fixtures::sample_model;

    fn ids(graph: &Graph) -> (HashSet<String>, HashSet<String>) {
        (
            graph.nodes.iter().map(|n| n.id.0.clone()).collect(),
            graph.edges.iter().map(|e| e.id.0.clone()).collect(),
        )
    }

    #[test]
    fn builds_one_node_per_entity_and_instance() {
        let output = GraphBuilder::build(&sample_model());
        let graph = &output.graph;

        let node_ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            node_ids,
            vec![
                "main/Main",
                "main/Main/greeter",
                "main/Main/printer",
                "main/Greeter",
                "main/Greeting",
                "main/Message",
                "std/Printer",
            ]
        );

        let printer = graph.node(&NodeId::from("main/Main/printer")).unwrap();
        assert_eq!(printer.kind, EntityKind::Node);
        assert_eq!(printer.label(), "printer: std.Printer");
        assert!(printer.position.is_none());
        assert_eq!(
            graph.node(&NodeId::from("std/Printer")).unwrap().kind,
            EntityKind::Interface
        );
        assert!(output.is_clean(), "{:?}", output.diagnostics);
    }

    #[test]
    fn builds_net_and_instantiation_edges() {
        let graph = GraphBuilder::build(&sample_model()).graph;

        let edges: Vec<_> = graph
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str(), e.kind))
            .collect();
        assert_eq!(
            edges,
            vec![
                ("main/Main/greeter", "main/Greeter", EdgeKind::Instantiates),
                ("main/Main/printer", "std/Printer", EdgeKind::Instantiates),
                ("main/Main", "main/Main/greeter", EdgeKind::Net),
                ("main/Greeting", "main/Main/greeter", EdgeKind::Net),
                ("main/Main/greeter", "main/Main/printer", EdgeKind::Net),
                ("main/Main/printer", "main/Main", EdgeKind::Net),
            ]
        );
        assert_eq!(graph.edges[2].id.as_str(), "main/Main/net/0/0");
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn fan_out_creates_one_edge_per_receiver() {
        let mut component = Component::default();
        for name in ["a", "b", "c"] {
            component.nodes.insert(
                name.into(),
                Instance {
                    entity_ref: EntityRef::local("Leaf"),
                },
            );
        }
        component.net.push(Connection {
            sender: SenderSide::Port(PortAddr::new("a", "out")),
            receivers: vec![PortAddr::new("b", "x"), PortAddr::new("c", "x")],
        });
        let model = EntityModel::new()
            .with_entity("p", "Root", Entity::component(component))
            .with_entity("p", "Leaf", Entity::component(Component::default()));

        let graph = GraphBuilder::build(&model).graph;
        let net: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Net)
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(net, vec!["p/Root/net/0/0", "p/Root/net/0/1"]);
    }

    #[test]
    fn unresolved_references_drop_edges_not_the_build() {
        let mut component = Component::default();
        component.nodes.insert(
            "ghost".into(),
            Instance {
                entity_ref: EntityRef::qualified("missing", "Thing"),
            },
        );
        component.net = vec![
            Connection {
                sender: SenderSide::Port(PortAddr::new("in", "x")),
                receivers: vec![PortAddr::new("ghost", "x"), PortAddr::new("nobody", "x")],
            },
            Connection {
                sender: SenderSide::Const(EntityRef::local("NoSuchConst")),
                receivers: vec![PortAddr::new("ghost", "y")],
            },
            Connection {
                sender: SenderSide::Port(PortAddr::new("phantom", "z")),
                receivers: vec![PortAddr::new("out", "y")],
            },
        ];
        let model = EntityModel::new().with_entity("main", "Main", Entity::component(component));

        let output = GraphBuilder::build(&model);
        assert_eq!(output.graph.node_count(), 2);
        assert_eq!(output.graph.edge_count(), 1);
        assert_eq!(output.graph.edges[0].target.as_str(), "main/Main/ghost");
        assert!(output.graph.validate().is_ok());

        let kinds: Vec<_> = output.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::UnresolvedEntityRef,
                DiagnosticKind::UnknownNetNode,
                DiagnosticKind::UnresolvedConst,
                DiagnosticKind::UnknownNetNode,
            ]
        );
    }

    #[test]
    fn const_sender_must_be_a_const() {
        let mut component = Component::default();
        component.nodes.insert(
            "n".into(),
            Instance {
                entity_ref: EntityRef::local("Main"),
            },
        );
        component.net.push(Connection {
            sender: SenderSide::Const(EntityRef::local("Shape")),
            receivers: vec![PortAddr::new("n", "x")],
        });
        let model = EntityModel::new()
            .with_entity("main", "Main", Entity::component(component))
            .with_entity("main", "Shape", Entity::type_def("struct {}"));

        let output = GraphBuilder::build(&model);
        assert!(output
            .graph
            .edges
            .iter()
            .all(|e| e.kind == EdgeKind::Instantiates));
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::UnresolvedConst);
    }

    #[test]
    fn rebuild_is_deterministic() {
        let model = sample_model();
        let first = GraphBuilder::build(&model).graph;
        let second = GraphBuilder::build(&model).graph;
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_paths_are_skipped() {
        let mut builder = GraphBuilder::new();
        let node = || {
            GraphNode::new(
                "p/A",
                EntityKind::Type,
                NodeData::Declaration {
                    package: "p".into(),
                    name: "A".into(),
                    exported: false,
                },
            )
        };
        assert!(builder.add_node(node()));
        assert!(!builder.add_node(node()));
        assert_eq!(builder.node_count(), 1);

        let output = builder.finish();
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::DuplicateNode);
    }

    #[test]
    fn add_edge_rejects_missing_endpoint() {
        let mut builder = GraphBuilder::new();
        builder.add_node(GraphNode::new(
            "p/A",
            EntityKind::Component,
            NodeData::Declaration {
                package: "p".into(),
                name: "A".into(),
                exported: true,
            },
        ));
        let added = builder.add_edge(
            EdgeId::from("x"),
            NodeId::from("p/A"),
            NodeId::from("p/B"),
            EdgeKind::Net,
        );
        assert!(!added);
        assert_eq!(builder.edge_count(), 0);

        let output = builder.finish();
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::DanglingEndpoint);
    }

    #[test]
    fn add_edge_rejects_duplicate_id() {
        let mut builder = GraphBuilder::new();
        for name in ["A", "B"] {
            builder.add_node(GraphNode::new(
                format!("p/{name}"),
                EntityKind::Component,
                NodeData::Declaration {
                    package: "p".into(),
                    name: name.into(),
                    exported: false,
                },
            ));
        }
        let edge = |builder: &mut GraphBuilder| {
            builder.add_edge(
                EdgeId::from("p/A/net/0/0"),
                NodeId::from("p/A"),
                NodeId::from("p/B"),
                EdgeKind::Net,
            )
        };

        assert!(edge(&mut builder));
        assert!(!edge(&mut builder));

        let output = builder.finish();
        assert_eq!(output.graph.edge_count(), 1);
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::DuplicateEdge);
    }

    #[test]
    fn colliding_paths_keep_only_the_first_entity() {
        let passthrough = || {
            let mut component = Component::default();
            component.net.push(Connection {
                sender: SenderSide::Port(PortAddr::new("in", "x")),
                receivers: vec![PortAddr::new("out", "y")],
            });
            Entity::component(component)
        };
        let model = EntityModel::new()
            .with_entity("a", "b/C", passthrough())
            .with_entity("a/b", "C", passthrough());

        let output = GraphBuilder::build(&model);
        let graph = &output.graph;

        assert_eq!(graph.node_count(), 1);
        let edge_ids: Vec<_> = graph.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(edge_ids, vec!["a/b/C/net/0/0"]);
        assert!(graph.validate().is_ok());

        let kinds: Vec<_> = output.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::DuplicateNode]);
    }

    #[test]
    fn references_to_a_shadowed_entity_are_dropped() {
        let mut user = Component::default();
        user.nodes.insert(
            "n".into(),
            Instance {
                entity_ref: EntityRef::qualified("a/b", "C"),
            },
        );
        let model = EntityModel::new()
            .with_entity("a", "b/C", Entity::type_def("int"))
            .with_entity("a/b", "C", Entity::component(Component::default()))
            .with_entity("main", "Main", Entity::component(user));

        let output = GraphBuilder::build(&model);

        assert_eq!(output.graph.edge_count(), 0);
        let kinds: Vec<_> = output.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::DuplicateNode,
                DiagnosticKind::UnresolvedEntityRef
            ]
        );
    }
}
