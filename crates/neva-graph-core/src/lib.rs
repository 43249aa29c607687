//! Core domain types for Neva program diagrams.
//!
//! The crate turns an already-parsed [`EntityModel`] into a renderable
//! [`Graph`] and derives hover emphasis for that graph.
//!
//! ## Pipeline
//!
//! ```text
//! EntityModel ──▶ GraphBuilder ──▶ Graph (unpositioned)
//!                                     │
//!                          layout provider (external)
//!                                     │
//!                                     ▼
//!            hover event ──▶ HighlightEngine ──▶ Graph (next snapshot)
//! ```
//!
//! Snapshots are shared as `Arc<Graph>`. Every highlight transition returns
//! a fresh snapshot, so a view can compare pointers to decide whether it
//! needs to redraw.

mod builder;
mod entity;
mod error;
mod graph;
mod highlight;
pub mod test_fixtures;

pub use builder::{BuildDiagnostic, BuildOutput, DiagnosticKind, GraphBuilder};
pub use entity::{
    format_entity_ref, Component, ConstDef, Connection, Entity, EntityBody, EntityKind,
    EntityModel, EntityRef, Instance, Interface, Io, Package, PortAddr, SenderSide, TypeDef,
};
pub use error::{GraphError, GraphResult};
pub use graph::{
    EdgeId, EdgeKind, Graph, GraphEdge, GraphNode, NodeData, NodeDisplay, NodeId, Position,
};
pub use highlight::{HighlightEngine, HighlightPolicy, HoverEvent};
