use crate::batch::Quad;
use crate::coords::Vec2;

use super::Shape;

/// Circle drawn as a quad sampling a circular mask texture.
///
/// Backing quad:
/// - `size = (radius, radius)`
/// - `position = center - (radius / 2, radius / 2)`
///
/// The footprint side equals the radius, so the mask renders with diameter
/// `radius`, centered on `center`. Every setter recomputes the quad immediately.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    radius: f32,
    center: Vec2,
    quad: Quad,
}

impl Circle {
    pub fn new(radius: f32, center: Vec2) -> Self {
        Self {
            radius,
            center,
            quad: backing_quad(radius, center),
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.center
    }

    /// Changes the radius, keeping the center fixed.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        self.quad = backing_quad(self.radius, self.center);
    }

    pub fn set_pos(&mut self, center: Vec2) {
        self.center = center;
        self.quad = backing_quad(self.radius, self.center);
    }
}

impl Shape for Circle {
    #[inline]
    fn quad(&self) -> Quad {
        self.quad
    }
}

fn backing_quad(radius: f32, center: Vec2) -> Quad {
    Quad::new(Vec2::splat(radius), center - Vec2::splat(radius * 0.5))
}
