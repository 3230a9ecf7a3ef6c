use super::Vec2;

/// Viewport size in logical pixels.
///
/// The batch shader uses this as the basis for converting logical px positions
/// to NDC.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Size as sent to shaders; never zero, so the NDC divide stays finite.
    #[inline]
    pub fn to_uniform(self) -> [f32; 2] {
        [self.width.max(1.0), self.height.max(1.0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_valid_requires_positive_finite_size() {
        assert!(Viewport::new(1280.0, 720.0).is_valid());
        assert!(!Viewport::new(0.0, 720.0).is_valid());
        assert!(!Viewport::new(1280.0, f32::NAN).is_valid());
    }

    #[test]
    fn uniform_never_zero() {
        assert_eq!(Viewport::new(0.0, 0.0).to_uniform(), [1.0, 1.0]);
        assert_eq!(Viewport::new(640.0, 480.0).to_uniform(), [640.0, 480.0]);
    }

    #[test]
    fn center_is_half_size() {
        assert_eq!(Viewport::new(100.0, 50.0).center(), Vec2::new(50.0, 25.0));
    }
}
