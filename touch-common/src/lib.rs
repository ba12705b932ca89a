//! Common types shared by the gesture crates.
//!
//! This crate provides plain value types used across the workspace:
//! - [`Vec2`] - 2D vector with f64 components, used for touch locations and
//!   per-frame touch displacement

/// A 2D vector with floating point components.
///
/// Touch locations are screen positions in pixels; touch directions are the
/// displacement since the previous frame as reported by the touch server.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Component-wise scale.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Bitwise equality of both components.
    ///
    /// Distinguishes `0.0` from `-0.0` and treats identical NaN payloads as
    /// equal, which is what wire round-trips need.
    pub fn bit_eq(&self, other: &Vec2) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Vec2> for (f64, f64) {
    fn from(v: Vec2) -> Self {
        (v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.x, 3.0);
        assert_eq!(v.y, 4.0);
        assert_eq!(v.norm(), 5.0);
    }

    #[test]
    fn test_scaled() {
        let v = Vec2::new(-0.02, 0.5).scaled(500.0);
        assert!((v.x + 10.0).abs() < 1e-12);
        assert!((v.y - 250.0).abs() < 1e-12);
    }

    #[test]
    fn test_bit_eq() {
        assert!(Vec2::new(1.5, -2.0).bit_eq(&Vec2::new(1.5, -2.0)));
        assert!(!Vec2::new(0.0, 0.0).bit_eq(&Vec2::new(-0.0, 0.0)));
        assert_eq!(Vec2::from((1.0, 2.0)), Vec2::new(1.0, 2.0));
    }
}
