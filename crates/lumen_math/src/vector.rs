//! Vector helpers used by the shading code.
//!
//! These sit on top of `glam::Vec3` and pin down the degenerate cases the
//! renderer relies on (zero-length normalization, near-zero detection).

use crate::Vec3;

/// Components below this magnitude count as zero for [`near_zero`].
pub const NEAR_ZERO_EPSILON: f32 = 1e-8;

/// Unit vector in the direction of `v`. The unit of a zero vector is zero.
#[inline]
pub fn unit(v: Vec3) -> Vec3 {
    let length = v.length();
    if length == 0.0 {
        Vec3::ZERO
    } else {
        v / length
    }
}

/// True when every component is within [`NEAR_ZERO_EPSILON`] of zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.abs().cmplt(Vec3::splat(NEAR_ZERO_EPSILON)).all()
}

/// Mirror `v` about the normal `n`: `v - 2(v·n)n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with unit normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices. Callers must rule out
/// total internal reflection first; otherwise the result is meaningless.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}
