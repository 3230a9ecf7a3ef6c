//! Quad batching.
//!
//! Quads are accumulated into fixed-capacity vertex/index arrays and handed to a
//! [`BatchBackend`] in bulk, one indexed draw per flush.
//!
//! Flow per frame:
//! - `BatchRenderer::draw` / `draw_quad` appends whole quads
//! - a rejected append raises `buffer_is_full()`; the caller submits, clears and
//!   re-draws the shape that did not fit
//! - a final `submit` at frame end flushes the remainder
//!
//! The renderer never flushes on its own. Dropping the full signal drops geometry.

mod backend;
mod buffer;
pub mod geometry;
mod quad;
mod renderer;

pub use backend::{BatchBackend, BatchUniforms};
pub use buffer::{BatchBuffer, BatchCapacity, MAX_PRIMITIVES};
pub use quad::Quad;
pub use renderer::{BatchRenderer, BatchStats};
