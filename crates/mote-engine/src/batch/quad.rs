use crate::coords::Vec2;

/// Axis-aligned quad in logical pixels.
///
/// `position` is the anchor corner (minimum x/y), not the center.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Quad {
    pub size: Vec2,
    pub position: Vec2,
}

impl Quad {
    #[inline]
    pub const fn new(size: Vec2, position: Vec2) -> Self {
        Self { size, position }
    }
}
