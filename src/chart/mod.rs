//! Chart construction and rendering backends.
//!
//! [`ChartEngine`] validates chart-type preconditions and delegates the
//! actual serialization to a [`RenderBackend`]: the interactive HTML backend
//! by default, with the static SVG backend as fallback.

mod backend;
mod engine;
mod error;
mod html;
pub mod palette;
mod svg;

pub use backend::*;
pub use engine::*;
pub use error::*;
pub use html::*;
pub use svg::*;
