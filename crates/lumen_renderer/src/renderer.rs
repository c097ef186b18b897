//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a bounce budget
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma-2 encoding at the pixel sink boundary

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::output::{ImageBuffer, PixelSink};
use crate::sampling::{gen_f32, pixel_rng};
use crate::{Camera, Color, Hittable, Ray, World};
use lumen_math::Interval;
use rand::RngCore;

/// Lower bound of the hit interval. Keeps scattered rays from re-hitting
/// the surface they leave because of floating point error.
pub const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed for the per-pixel random streams
    pub seed: u64,
    /// Edge length of a parallel render bucket in pixels
    pub bucket_size: u32,
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.image_width as f32 / self.image_height as f32
    }

    pub fn pixel_count(&self) -> u64 {
        self.image_width as u64 * self.image_height as u64
    }

    /// Reject settings the driver cannot render.
    pub fn validate(&self) -> RenderResult<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image must be at least 1x1, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        if ImageBuffer::byte_len(self.image_width, self.image_height).is_none() {
            return Err(RenderError::InvalidConfig(format!(
                "image {}x{} is too large to allocate",
                self.image_width, self.image_height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".into(),
            ));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidConfig(
                "bucket_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
            bucket_size: crate::bucket::DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Cooperative cancellation flag shared between the caller and a render.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every render holding this token to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Summary of a finished render.
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    pub pixels: u64,
    /// Camera rays traced (pixels x samples per pixel)
    pub samples: u64,
    pub elapsed: Duration,
}

/// Compute the color seen by a ray.
///
/// Terminal states: bounce budget exhausted (black), escaped to the
/// background, or absorbed (emission only). Otherwise the material scatters
/// and the gathered light is attenuated component-wise.
pub fn ray_color(ray: &Ray, world: &World, depth: u32, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY)) else {
        return world.background().color(ray);
    };

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, rng);
            emission + result.attenuation * scattered_color
        }
        None => emission,
    }
}

/// Sum `samples_per_pixel` jittered samples for pixel (x, y).
///
/// Row 0 is the top of the image, and `(x, y)` must lie inside the
/// configured resolution. The result is not averaged; the pixel sink divides
/// by the sample count during encoding.
pub fn render_pixel(
    camera: &Camera,
    world: &World,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    debug_assert!(
        x < config.image_width && y < config.image_height,
        "pixel ({x}, {y}) outside {}x{} image",
        config.image_width,
        config.image_height
    );

    let width = config.image_width as f32;
    let height = config.image_height as f32;
    let row_from_bottom = (config.image_height - 1 - y) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / width;
        let t = (row_from_bottom + gen_f32(rng)) / height;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, rng);
    }

    pixel_color
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    linear.sqrt()
}

/// Convert an accumulated sample sum into 8-bit RGB.
///
/// Averages, gamma-encodes with `sqrt`, then scales by 256 after clamping to
/// [0, 0.999]. This is the only float-to-integer color conversion in the
/// renderer. NaN channels encode as 0.
pub fn encode_color(accumulated: Color, samples: u32) -> [u8; 3] {
    const INTENSITY: Interval = Interval::new(0.0, 0.999);

    let scale = 1.0 / samples as f32;
    let channel = |c: f32| (256.0 * INTENSITY.clamp(linear_to_gamma(c * scale))) as u8;

    [
        channel(accumulated.x),
        channel(accumulated.y),
        channel(accumulated.z),
    ]
}

/// Render the entire image in raster order on the calling thread.
///
/// The cancel token is checked before every pixel.
pub fn render(
    camera: &Camera,
    world: &World,
    config: &RenderConfig,
    sink: &mut dyn PixelSink,
    cancel: &CancelToken,
) -> RenderResult<RenderStats> {
    config.validate()?;
    let start = Instant::now();

    log::info!(
        "Rendering {}x{} @ {} spp, depth {} (sequential, {} objects)",
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
        config.max_depth,
        world.len()
    );

    for y in 0..config.image_height {
        for x in 0..config.image_width {
            if cancel.is_cancelled() {
                log::warn!("Render cancelled at pixel ({}, {})", x, y);
                return Err(RenderError::Cancelled);
            }

            let mut rng = pixel_rng(config.seed, x, y);
            let color = render_pixel(camera, world, x, y, config, &mut rng);
            sink.write_color(x, y, color, config.samples_per_pixel);
        }
        log::debug!("Scanline {}/{} done", y + 1, config.image_height);
    }

    let stats = RenderStats {
        pixels: config.pixel_count(),
        samples: config.pixel_count() * config.samples_per_pixel as u64,
        elapsed: start.elapsed(),
    };
    log::info!("Rendered {} pixels in {:?}", stats.pixels, stats.elapsed);

    Ok(stats)
}
