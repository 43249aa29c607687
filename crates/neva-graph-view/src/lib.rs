//! Glue between the diagram core and a drawing surface.
//!
//! [`GraphController`] owns the snapshot, [`RendererRegistry`] picks a
//! renderer per kind, and [`GraphView`] is implemented by the host surface.

mod controller;
mod renderer;
mod style;
mod view;

pub use controller::GraphController;
pub use renderer::{EdgeRenderer, NodeRenderer, RendererRegistry};
pub use style::{resolve_edge_style, resolve_node_style, EdgeStyle, NodeStyle};
pub use view::GraphView;
