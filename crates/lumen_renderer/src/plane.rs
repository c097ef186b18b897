//! Infinite plane primitive.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{unit, Interval, Vec3};

/// Rays closer to parallel than this never hit the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// An infinite plane through `point` with unit normal `normal`.
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    // In-plane basis for surface coordinates
    tangent: Vec3,
    bitangent: Vec3,
    material: Arc<dyn Material>,
}

impl Plane {
    /// Create a plane. The normal is normalized; its direction picks the front face.
    pub fn new(point: Vec3, normal: Vec3, material: Arc<dyn Material>) -> Self {
        let normal = unit(normal);
        let helper = if normal.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let tangent = unit(helper.cross(normal));
        let bitangent = normal.cross(tangent);

        Self {
            point,
            normal,
            tangent,
            bitangent,
            material,
        }
    }

    /// Fractional planar coordinates, tiling every world unit.
    fn get_plane_uv(&self, p: Vec3) -> (f32, f32) {
        let local = p - self.point;
        (
            local.dot(self.tangent).rem_euclid(1.0),
            local.dot(self.bitangent).rem_euclid(1.0),
        )
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = self.normal.dot(self.point - ray.origin()) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let uv = self.get_plane_uv(ray.at(t));
        Some(HitRecord::new(ray, t, self.normal, uv, self.material.as_ref()))
    }
}
