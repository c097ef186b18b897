//! Built-in scenes.

use std::sync::Arc;

use clap::ValueEnum;
use lumen_renderer::{
    Background, CameraConfig, CheckerTexture, Color, Dielectric, DiffuseLight, Lambertian,
    Material, Metal, Plane, Sphere, Vec3, World,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Diffuse, glass and metal spheres on a large ground sphere
    ThreeSpheres,
    /// The classic cover scene with many small random spheres
    RandomSpheres,
    /// Checker-textured spheres and ground plane
    Checkered,
    /// Spheres over a plane, lit only by an emissive sphere
    LitPlane,
}

/// A fully built world plus the camera that frames it.
pub struct Scene {
    pub world: World,
    pub camera: CameraConfig,
}

pub fn build(kind: SceneKind, seed: u64) -> Scene {
    match kind {
        SceneKind::ThreeSpheres => three_spheres(),
        SceneKind::RandomSpheres => random_spheres(seed),
        SceneKind::Checkered => checkered(),
        SceneKind::LitPlane => lit_plane(),
    }
}

fn sphere(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Box<Sphere> {
    Box::new(Sphere::new(center, radius, material))
}

fn three_spheres() -> Scene {
    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
    let center: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let bubble: Arc<dyn Material> = Arc::new(Dielectric::new(1.0 / 1.5));
    let gold: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.0));

    let mut world = World::new(Background::SkyGradient);
    world.add(sphere(Vec3::new(0.0, -100.5, -1.0), 100.0, ground));
    world.add(sphere(Vec3::new(0.0, 0.0, -1.2), 0.5, center));
    world.add(sphere(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass));
    world.add(sphere(Vec3::new(-1.0, 0.0, -1.0), 0.4, bubble));
    world.add(sphere(Vec3::new(1.0, 0.0, -1.0), 0.5, gold));

    let camera = CameraConfig::new()
        .with_position(Vec3::new(-2.0, 2.0, 1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(20.0, 0.2, 3.4);

    Scene { world, camera }
}

fn random_spheres(seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = World::new(Background::SkyGradient);

    world.add(sphere(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Color::splat(0.5))),
    ));

    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                Arc::new(Metal::new(albedo, rng.gen_range(0.0..0.5)))
            } else {
                Arc::new(Dielectric::new(1.5))
            };
            world.add(sphere(center, 0.2, material));
        }
    }

    world.add(sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5))));
    world.add(sphere(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    ));
    world.add(sphere(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    let camera = CameraConfig::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0);

    Scene { world, camera }
}

fn checkered() -> Scene {
    let checker: Arc<dyn Material> = Arc::new(Lambertian::with_texture(Arc::new(
        CheckerTexture::from_colors(Color::new(0.2, 0.3, 0.1), Color::splat(0.9)),
    )));

    let mut world = World::new(Background::SkyGradient);
    world.add(Box::new(Plane::new(Vec3::new(0.0, -10.0, 0.0), Vec3::Y, checker.clone())));
    world.add(sphere(Vec3::new(0.0, -6.0, 0.0), 4.0, checker.clone()));
    world.add(sphere(Vec3::new(0.0, 6.0, 0.0), 4.0, checker));

    let camera = CameraConfig::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(40.0, 0.0, 10.0);

    Scene { world, camera }
}

fn lit_plane() -> Scene {
    let mut world = World::new(Background::Solid(Color::ZERO));

    world.add(Box::new(Plane::new(
        Vec3::new(0.0, -2.0, 0.0),
        Vec3::Y,
        Arc::new(Lambertian::new(Color::splat(0.5))),
    )));
    world.add(sphere(
        Vec3::new(0.0, 0.0, 5.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.8, 0.1, 0.1))),
    ));
    world.add(sphere(
        Vec3::new(2.5, -0.5, 3.0),
        0.8,
        Arc::new(Metal::new(Color::new(0.1, 0.8, 0.1), 0.2)),
    ));
    world.add(sphere(
        Vec3::new(-2.0, -1.0, 3.5),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(sphere(
        Vec3::new(10.0, 10.0, 10.0),
        6.0,
        Arc::new(DiffuseLight::new(Color::splat(4.0))),
    ));

    let camera = CameraConfig::new()
        .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::Y)
        .with_lens(45.0, 0.0, 1.0);

    Scene { world, camera }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_scene_builds() {
        for kind in SceneKind::value_variants() {
            let scene = build(*kind, 7);
            assert!(!scene.world.is_empty(), "{kind:?} has no objects");
        }
    }

    #[test]
    fn test_random_scene_is_seeded() {
        let a = build(SceneKind::RandomSpheres, 3).world.len();
        let b = build(SceneKind::RandomSpheres, 3).world.len();
        assert_eq!(a, b);
    }
}
