//! Shape adapters.
//!
//! A shape owns its semantic parameters and keeps the backing [`Quad`](crate::batch::Quad)
//! the batch renderer consumes. Shapes are cheap values, built and dropped per frame
//! or mutated in place.

pub mod shapes;

pub use shapes::{Circle, Shape};
