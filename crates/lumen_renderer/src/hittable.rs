//! Hittable trait, HitRecord, and the World surface collection.

use serde::{Deserialize, Serialize};

use crate::{Color, Material, Ray};
use lumen_math::{unit, Interval, Vec3};

/// Record of a ray-object intersection.
///
/// Borrowed from the surface that produced it; lives for one shading step.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface coordinates for texture lookup
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record at parameter `t`, orienting the normal against the ray.
    ///
    /// `outward_normal` must be unit length.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a dyn Material,
    ) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p: ray.at(t),
            normal,
            material,
            u,
            v,
            t,
            front_face,
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Intersect `ray` within `ray_t` (inclusive bounds).
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

/// Radiance returned for rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// A constant color.
    Solid(Color),
    /// Vertical blend from white at the horizon to sky blue overhead.
    SkyGradient,
}

impl Background {
    const SKY_BOTTOM: Color = Color::new(1.0, 1.0, 1.0);
    const SKY_TOP: Color = Color::new(0.5, 0.7, 1.0);

    /// Color seen along an escaping ray.
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::SkyGradient => {
                let a = 0.5 * (unit(ray.direction()).y + 1.0);
                (1.0 - a) * Self::SKY_BOTTOM + a * Self::SKY_TOP
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// The scene: every surface plus the background policy.
///
/// Read-only while rendering. Intersection is a linear scan.
pub struct World {
    objects: Vec<Box<dyn Hittable>>,
    background: Background,
}

impl World {
    /// Create an empty world.
    pub fn new(background: Background) -> Self {
        Self {
            objects: Vec::new(),
            background,
        }
    }

    /// Add an object to the world.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Background::default())
    }
}

impl Hittable for World {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        // Each accepted hit tightens the upper bound, so a later surface only
        // wins when it is strictly nearer. Exact ties keep the first one.
        for object in &self.objects {
            let bound = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            let interval = ray_t.with_max(bound);
            if let Some(rec) = object.hit(ray, interval) {
                if closest.as_ref().map_or(true, |best| rec.t < best.t) {
                    closest = Some(rec);
                }
            }
        }

        closest
    }
}
