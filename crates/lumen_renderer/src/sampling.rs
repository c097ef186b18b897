//! Random sampling helpers.
//!
//! Every draw goes through an explicitly passed generator so a render is
//! reproducible from its seed, whichever thread a pixel lands on.

use lumen_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Uniform f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform f32 in [min, max).
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Vector with each component uniform in [min, max).
pub fn random_vec(rng: &mut dyn RngCore, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        gen_range(rng, min, max),
        gen_range(rng, min, max),
        gen_range(rng, min, max),
    )
}

/// Uniform point inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random direction on the unit sphere.
///
/// A sample landing exactly on the center normalizes to zero; the Lambertian
/// near-zero fallback covers that case.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    lumen_math::unit(random_in_unit_sphere(rng))
}

/// Uniform point inside the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Independent random stream for one pixel.
///
/// The seed depends only on the base seed and the pixel coordinate, so the
/// parallel and sequential drivers produce identical images.
pub fn pixel_rng(seed: u64, x: u32, y: u32) -> StdRng {
    let coord = ((y as u64) << 32) | x as u64;
    StdRng::seed_from_u64(splitmix64(splitmix64(seed) ^ coord))
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
