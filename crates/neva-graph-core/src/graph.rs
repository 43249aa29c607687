//! Renderable graph snapshot: kind-tagged nodes, directed edges and their
//! transient display flags.

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::{Deserialize, Serialize};

use crate::entity::{format_entity_ref, EntityKind, EntityRef};
use crate::error::{GraphError, GraphResult};

/// Globally unique node identifier derived from the entity's structural path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId(value)
    }
}

/// Unique edge identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        EdgeId(value.to_string())
    }
}

impl From<String> for EdgeId {
    fn from(value: String) -> Self {
        EdgeId(value)
    }
}

/// A 2D position assigned by the layout stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Visual emphasis of a node. Highlighted and dimmed exclude each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeDisplay {
    #[default]
    Neutral,
    Highlighted,
    Dimmed,
}

/// Kind-specific payload carried by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeData {
    /// Package-level declaration: component, interface, type or const.
    Declaration {
        package: String,
        name: String,
        exported: bool,
    },
    /// Node instantiated inside a component.
    Instance {
        component: String,
        name: String,
        entity_ref: EntityRef,
    },
}

impl NodeData {
    /// Short human readable label, e.g. `Main` or `printer: std.Printer`.
    pub fn label(&self) -> String {
        match self {
            NodeData::Declaration { name, .. } => name.clone(),
            NodeData::Instance {
                name, entity_ref, ..
            } => format!("{}: {}", name, format_entity_ref(Some(entity_ref))),
        }
    }

    /// The entity this payload instantiates, if any.
    pub fn entity_ref(&self) -> Option<&EntityRef> {
        match self {
            NodeData::Instance { entity_ref, .. } => Some(entity_ref),
            NodeData::Declaration { .. } => None,
        }
    }
}

/// A node of the renderable graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub kind: EntityKind,
    pub data: NodeData,
    /// `None` until the layout stage has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub display: NodeDisplay,
}

impl GraphNode {
    pub fn new(id: impl Into<NodeId>, kind: EntityKind, data: NodeData) -> Self {
        Self {
            id: id.into(),
            kind,
            data,
            position: None,
            display: NodeDisplay::Neutral,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.display == NodeDisplay::Highlighted
    }

    pub fn is_dimmed(&self) -> bool {
        self.display == NodeDisplay::Dimmed
    }

    pub fn label(&self) -> String {
        self.data.label()
    }
}

/// Structural relationship an edge stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Network connection between two nodes of a component.
    #[default]
    Net,
    /// Instance pointing at the entity it instantiates.
    Instantiates,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Net => write!(f, "net"),
            EdgeKind::Instantiates => write!(f, "instantiates"),
        }
    }
}

/// A directed edge of the renderable graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub kind: EdgeKind,
    #[serde(default)]
    pub highlighted: bool,
}

impl GraphEdge {
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        kind: EdgeKind,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind,
            highlighted: false,
        }
    }

    /// Whether `node` is either endpoint of this edge.
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

/// Node and edge lists in insertion order. Order only affects drawing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    /// Creates an empty graph with no nodes or edges.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edges.iter().find(|edge| &edge.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Nodes one edge away from `id`, in either direction, without
    /// duplicates and in edge order.
    pub fn neighbors(&self, id: &NodeId) -> Vec<&NodeId> {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .filter_map(|edge| {
                if &edge.source == id {
                    Some(&edge.target)
                } else if &edge.target == id {
                    Some(&edge.source)
                } else {
                    None
                }
            })
            .filter(|neighbor| seen.insert(*neighbor))
            .collect()
    }

    /// Whether no node or edge carries any emphasis.
    pub fn is_neutral(&self) -> bool {
        self.nodes
            .iter()
            .all(|node| node.display == NodeDisplay::Neutral)
            && self.edges.iter().all(|edge| !edge.highlighted)
    }

    /// Clears every display flag, keeping positions.
    pub fn into_neutral(mut self) -> Self {
        for node in &mut self.nodes {
            node.display = NodeDisplay::Neutral;
        }
        for edge in &mut self.edges {
            edge.highlighted = false;
        }
        self
    }

    /// Checks that node and edge ids are unique and every edge endpoint is
    /// present.
    pub fn validate(&self) -> GraphResult<()> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(&node.id) {
                return Err(GraphError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }

        let mut edge_ids = HashSet::with_capacity(self.edges.len());
        for edge in &self.edges {
            if !edge_ids.insert(&edge.id) {
                return Err(GraphError::DuplicateEdge {
                    id: edge.id.clone(),
                });
            }
            for endpoint in [&edge.source, &edge.target] {
                if !ids.contains(endpoint) {
                    return Err(GraphError::DanglingEdge {
                        edge: edge.id.clone(),
                        endpoint: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Convert to petgraph StableDiGraph for analysis.
    /// Returns the graph and a mapping from NodeId to NodeIndex.
    pub fn to_petgraph(&self) -> (StableDiGraph<GraphNode, EdgeKind>, HashMap<NodeId, NodeIndex>) {
        let mut graph = StableDiGraph::new();
        let mut id_to_index = HashMap::new();

        for node in &self.nodes {
            let idx = graph.add_node(node.clone());
            id_to_index.insert(node.id.clone(), idx);
        }

        for edge in &self.edges {
            if let (Some(&from_idx), Some(&to_idx)) =
                (id_to_index.get(&edge.source), id_to_index.get(&edge.target))
            {
                graph.add_edge(from_idx, to_idx, edge.kind);
            }
        }

        (graph, id_to_index)
    }

    /// Nodes without any incident edge, in node order.
    pub fn unconnected_nodes(&self) -> Vec<&NodeId> {
        let (graph, index) = self.to_petgraph();
        self.nodes
            .iter()
            .map(|node| &node.id)
            .filter(|id| {
                index
                    .get(*id)
                    .is_some_and(|&idx| graph.neighbors_undirected(idx).next().is_none())
            })
            .collect()
    }
}
