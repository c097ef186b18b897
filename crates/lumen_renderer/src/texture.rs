//! Procedural textures for material albedo and emission.

use std::sync::Arc;

use crate::Color;
use lumen_math::Vec3;

/// A color lookup over surface coordinates and world position.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// A 3D checker pattern alternating between two textures.
///
/// The parity comes from the sign of `sin(sx)·sin(sy)·sin(sz)` at the hit
/// point, so the pattern is solid through space rather than wrapped in UV.
pub struct CheckerTexture {
    odd: Arc<dyn Texture>,
    even: Arc<dyn Texture>,
    scale: f32,
}

impl CheckerTexture {
    /// Default frequency of the pattern along each axis.
    pub const DEFAULT_SCALE: f32 = 10.0;

    pub fn new(odd: Arc<dyn Texture>, even: Arc<dyn Texture>) -> Self {
        Self {
            odd,
            even,
            scale: Self::DEFAULT_SCALE,
        }
    }

    /// Checker between two solid colors.
    pub fn from_colors(odd: Color, even: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(odd)), Arc::new(SolidColor::new(even)))
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let s = self.scale;
        let sines = (s * p.x).sin() * (s * p.y).sin() * (s * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_ignores_coordinates() {
        let tex = SolidColor::rgb(0.2, 0.4, 0.6);
        let expected = Color::new(0.2, 0.4, 0.6);
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), expected);
        assert_eq!(tex.value(0.9, 0.1, Vec3::new(5.0, -3.0, 2.0)), expected);
    }

    #[test]
    fn test_checker_alternates() {
        let odd = Color::new(1.0, 0.0, 0.0);
        let even = Color::new(0.0, 0.0, 1.0);
        let checker = CheckerTexture::from_colors(odd, even).with_scale(1.0);

        // All three sines positive
        let p = Vec3::splat(std::f32::consts::FRAC_PI_2);
        assert_eq!(checker.value(0.0, 0.0, p), even);

        // Flip one axis into the negative half-period
        let q = Vec3::new(-std::f32::consts::FRAC_PI_2, p.y, p.z);
        assert_eq!(checker.value(0.0, 0.0, q), odd);
    }
}
