//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over implicit surfaces (spheres, planes).
//! Surfaces are scanned linearly per ray; parallelism is per bucket with
//! one seeded random stream per pixel.

mod bucket;
mod camera;
mod error;
mod hittable;
mod material;
mod output;
mod plane;
mod renderer;
pub mod sampling;
mod sphere;
mod texture;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use camera::{Camera, CameraConfig};
pub use error::{RenderError, RenderResult};
pub use hittable::{Background, HitRecord, Hittable, World};
pub use material::{Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult};
pub use output::{save_image, write_ppm, ImageBuffer, PixelSink};
pub use plane::Plane;
pub use renderer::{
    encode_color, linear_to_gamma, ray_color, render, render_pixel, CancelToken, RenderConfig,
    RenderStats, SHADOW_ACNE_EPSILON,
};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, SolidColor, Texture};

/// Re-export math types from lumen_math
pub use lumen_math::{Color, Interval, Ray, Vec3};
