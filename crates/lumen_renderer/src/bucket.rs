//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! on the rayon thread pool. Each pixel draws from its own seeded stream, so
//! the result matches the sequential renderer bit for bit.

use std::time::Instant;

use rayon::prelude::*;

use crate::error::{RenderError, RenderResult};
use crate::output::PixelSink;
use crate::renderer::{render_pixel, CancelToken, RenderConfig, RenderStats};
use crate::sampling::pixel_rng;
use crate::{Camera, Color, World};

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Global pixel coordinates in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| (x, y)))
    }
}

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Center buckets come first so an interactive viewer sees the subject early.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    // Stable sort keeps raster order among equidistant buckets
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Accumulated (unaveraged) pixel colors in row-major order
    pub pixels: Vec<Color>,
}

/// Render a single bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &World,
    config: &RenderConfig,
) -> BucketResult {
    let pixels = bucket
        .pixels()
        .map(|(x, y)| {
            let mut rng = pixel_rng(config.seed, x, y);
            render_pixel(camera, world, x, y, config, &mut rng)
        })
        .collect();

    BucketResult {
        bucket: *bucket,
        pixels,
    }
}

/// Render the image in parallel buckets and hand every pixel to `sink`.
///
/// The cancel token is checked before each bucket starts. Pixels reach the
/// sink only after every bucket has finished, in bucket order.
pub fn render_parallel(
    camera: &Camera,
    world: &World,
    config: &RenderConfig,
    sink: &mut dyn PixelSink,
    cancel: &CancelToken,
) -> RenderResult<RenderStats> {
    config.validate()?;
    let start = Instant::now();
    let buckets = generate_buckets(config.image_width, config.image_height, config.bucket_size);

    log::info!(
        "Rendering {}x{} @ {} spp, depth {} ({} buckets on {} threads, {} objects)",
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len(),
        rayon::current_num_threads(),
        world.len()
    );

    let results: Vec<Option<BucketResult>> = buckets
        .par_iter()
        .map(|bucket| {
            if cancel.is_cancelled() {
                return None;
            }
            let result = render_bucket(bucket, camera, world, config);
            log::debug!("Bucket {}/{} done", bucket.index + 1, buckets.len());
            Some(result)
        })
        .collect();

    if cancel.is_cancelled() || results.iter().any(Option::is_none) {
        log::warn!("Render cancelled");
        return Err(RenderError::Cancelled);
    }

    for result in results.into_iter().flatten() {
        for ((x, y), color) in result.bucket.pixels().zip(result.pixels) {
            sink.write_color(x, y, color, config.samples_per_pixel);
        }
    }

    let stats = RenderStats {
        pixels: config.pixel_count(),
        samples: config.pixel_count() * config.samples_per_pixel as u64,
        elapsed: start.elapsed(),
    };
    log::info!("Rendered {} pixels in {:?}", stats.pixels, stats.elapsed);

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 70, 64);
        assert_eq!(buckets.len(), 4);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 70);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9);

        // First bucket should be the center one
        assert_eq!((buckets[0].x, buckets[0].y), (64, 64));
        for (i, bucket) in buckets.iter().enumerate() {
            assert_eq!(bucket.index, i);
        }
    }

    #[test]
    fn test_buckets_cover_every_pixel_once() {
        let (width, height) = (37, 23);
        let mut seen = vec![0u32; (width * height) as usize];
        for bucket in generate_buckets(width, height, 8) {
            for (x, y) in bucket.pixels() {
                seen[(y * width + x) as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn test_bucket_pixels_row_major() {
        let bucket = Bucket::new(2, 5, 2, 2, 0);
        let pixels: Vec<_> = bucket.pixels().collect();
        assert_eq!(pixels, vec![(2, 5), (3, 5), (2, 6), (3, 6)]);
    }
}
