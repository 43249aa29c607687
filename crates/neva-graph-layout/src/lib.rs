//! Layout stage for Neva program diagrams.
//!
//! Layout itself is computed elsewhere; this crate defines how a positioned
//! snapshot is requested and applied:
//!
//! - [`LayoutProvider`] is the asynchronous contract a layout engine fulfils.
//! - [`LayoutSession`] tags every request with a generation number and only
//!   applies a result that is newer than the one already on screen, so a
//!   slow, older request can never overwrite a faster, newer one.
//! - [`StaticLayout`] applies precomputed coordinates, e.g. from a JSON file
//!   written by an external layout tool; [`PassthroughLayout`] leaves
//!   placement to the drawing surface.

mod error;
mod provider;
mod session;

pub use error::LayoutError;
pub use provider::{resolve, LayoutProvider, PassthroughLayout, StaticLayout};
pub use session::{LayoutOutcome, LayoutSession, LayoutStatus, LayoutTicket};

/// Result type for layout operations.
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
