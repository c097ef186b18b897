//! End-to-end renders of small scenes.

use std::sync::Arc;

use lumen_renderer::{
    render, render_parallel, render_pixel, sampling::pixel_rng, Background, CameraConfig,
    CancelToken, CheckerTexture, Color, Dielectric, ImageBuffer, Lambertian, Metal, Plane,
    RenderConfig, RenderError, Sphere, Vec3, World,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn test_scene() -> World {
    let mut world = World::new(Background::SkyGradient);
    world.add(Box::new(Plane::new(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::Y,
        Arc::new(Lambertian::with_texture(Arc::new(CheckerTexture::from_colors(
            Color::new(0.2, 0.3, 0.1),
            Color::splat(0.9),
        )))),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 0.0, -1.0),
        0.5,
        Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5))),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(-1.0, 0.0, -1.0),
        0.5,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(1.0, 0.0, -1.0),
        0.5,
        Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.3)),
    )));
    world
}

fn small_config(samples: u32) -> RenderConfig {
    RenderConfig {
        bucket_size: 7,
        ..RenderConfig::default()
            .with_resolution(24, 16)
            .with_quality(samples, 8)
            .with_seed(1234)
    }
}

fn camera_for(config: &RenderConfig) -> lumen_renderer::Camera {
    CameraConfig::new()
        .with_position(Vec3::new(-2.0, 2.0, 1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(30.0, 0.1, 3.4)
        .with_aspect_ratio(config.aspect_ratio())
        .build()
}

#[test]
fn seeded_render_is_deterministic() {
    init_logging();
    let world = test_scene();
    let config = small_config(1);
    let camera = camera_for(&config);

    let mut first = ImageBuffer::new(config.image_width, config.image_height);
    let mut second = ImageBuffer::new(config.image_width, config.image_height);
    render(&camera, &world, &config, &mut first, &CancelToken::new()).unwrap();
    render(&camera, &world, &config, &mut second, &CancelToken::new()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn different_seeds_give_different_noise() {
    init_logging();
    let world = test_scene();
    let config = small_config(1);
    let camera = camera_for(&config);

    let mut first = ImageBuffer::new(config.image_width, config.image_height);
    let mut second = ImageBuffer::new(config.image_width, config.image_height);
    render(&camera, &world, &config, &mut first, &CancelToken::new()).unwrap();
    let reseeded = config.clone().with_seed(99);
    render(&camera, &world, &reseeded, &mut second, &CancelToken::new()).unwrap();

    assert_ne!(first, second);
}

#[test]
fn parallel_matches_sequential() {
    init_logging();
    let world = test_scene();
    let config = small_config(3);
    let camera = camera_for(&config);

    let mut sequential = ImageBuffer::new(config.image_width, config.image_height);
    let mut parallel = ImageBuffer::new(config.image_width, config.image_height);
    render(&camera, &world, &config, &mut sequential, &CancelToken::new()).unwrap();
    let stats =
        render_parallel(&camera, &world, &config, &mut parallel, &CancelToken::new()).unwrap();

    assert_eq!(stats.pixels, 24 * 16);
    assert_eq!(stats.samples, 24 * 16 * 3);
    assert_eq!(sequential, parallel);
}

#[test]
fn cancelled_parallel_render_writes_nothing() {
    init_logging();
    let world = test_scene();
    let config = small_config(2);
    let camera = camera_for(&config);
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut image = ImageBuffer::new(config.image_width, config.image_height);
    let err = render_parallel(&camera, &world, &config, &mut image, &cancel).unwrap_err();

    assert!(matches!(err, RenderError::Cancelled));
    assert_eq!(image, ImageBuffer::new(config.image_width, config.image_height));
}

#[test]
fn more_samples_reduce_variance() {
    init_logging();
    // Diffuse sphere lit only by a white environment
    let mut world = World::new(Background::Solid(Color::ONE));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 0.0, -1.0),
        0.5,
        Arc::new(Lambertian::new(Color::splat(0.6))),
    )));
    world.add(Box::new(Plane::new(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::Y,
        Arc::new(Lambertian::new(Color::splat(0.5))),
    )));

    let base = RenderConfig::default()
        .with_resolution(8, 8)
        .with_quality(1, 6);
    let camera = CameraConfig::new().with_aspect_ratio(1.0).build();

    let variance_at = |samples: u32| {
        let config = base.clone().with_quality(samples, 6);
        let estimates: Vec<f32> = (0..40u64)
            .map(|seed| {
                let mut rng = pixel_rng(seed, 4, 5);
                let sum = render_pixel(&camera, &world, 4, 5, &config, &mut rng);
                sum.x / samples as f32
            })
            .collect();
        let mean = estimates.iter().sum::<f32>() / estimates.len() as f32;
        estimates.iter().map(|e| (e - mean).powi(2)).sum::<f32>() / estimates.len() as f32
    };

    let noisy = variance_at(1);
    let converged = variance_at(100);
    assert!(noisy > 0.0);
    assert!(converged < noisy, "variance {converged} at 100 spp vs {noisy} at 1 spp");
}
