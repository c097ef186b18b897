use crate::Vec3;

/// A ray in 3D space with origin, direction, and a wavelength tag.
///
/// The direction is not required to be normalized. The wavelength is carried
/// through every scatter unchanged; nothing in the base shading model reads it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub wavelength: f32,
}

impl Ray {
    /// Create an untagged ray (wavelength 0).
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_wavelength(origin, direction, 0.0)
    }

    /// Create a ray carrying a wavelength tag.
    #[inline]
    pub fn with_wavelength(origin: Vec3, direction: Vec3, wavelength: f32) -> Self {
        Self {
            origin,
            direction,
            wavelength,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn wavelength(&self) -> f32 {
        self.wavelength
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}
