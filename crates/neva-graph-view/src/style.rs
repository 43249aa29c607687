//! Default translation of emphasis flags into visual parameters.
//!
//! Hosts with their own drawing rules can ignore this module; the core only
//! ever sets flags.

use neva_graph_core::{GraphEdge, GraphNode, NodeDisplay};
use serde::Serialize;

const DIMMED_OPACITY: f32 = 0.25;
const BASE_STROKE: f32 = 1.0;
const HIGHLIGHT_STROKE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeStyle {
    pub opacity: f32,
    pub stroke_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeStyle {
    pub stroke_width: f32,
    pub animated: bool,
}

pub fn resolve_node_style(node: &GraphNode) -> NodeStyle {
    match node.display {
        NodeDisplay::Neutral => NodeStyle {
            opacity: 1.0,
            stroke_width: BASE_STROKE,
        },
        NodeDisplay::Highlighted => NodeStyle {
            opacity: 1.0,
            stroke_width: HIGHLIGHT_STROKE,
        },
        NodeDisplay::Dimmed => NodeStyle {
            opacity: DIMMED_OPACITY,
            stroke_width: BASE_STROKE,
        },
    }
}

pub fn resolve_edge_style(edge: &GraphEdge) -> EdgeStyle {
    if edge.highlighted {
        EdgeStyle {
            stroke_width: HIGHLIGHT_STROKE,
            animated: true,
        }
    } else {
        EdgeStyle {
            stroke_width: BASE_STROKE,
            animated: false,
        }
    }
}
