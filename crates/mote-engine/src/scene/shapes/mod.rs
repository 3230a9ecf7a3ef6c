mod circle;

pub use circle::Circle;

use crate::batch::Quad;

/// Anything the batch renderer can draw as one quad.
pub trait Shape {
    /// The quad footprint fed to the batch.
    fn quad(&self) -> Quad;
}

impl Shape for Quad {
    #[inline]
    fn quad(&self) -> Quad {
        *self
    }
}
