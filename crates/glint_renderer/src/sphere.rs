//! Sphere primitive for ray tracing.

use crate::{HitRecord, Hittable, Material, SceneError};
use glint_math::{Aabb, Interval, Ray, Vec3};
use std::sync::Arc;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// A zero, negative or non-finite radius has no well-defined surface
    /// normal and is rejected here rather than during tracing.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Result<Self, SceneError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SceneError::DegenerateSphere(radius));
        }
        if !center.is_finite() {
            return Err(SceneError::NonFiniteCenter);
        }

        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Ok(Self {
            center,
            radius,
            material,
            bbox,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> HitRecord<'a> {
        // |O + tD - C|^2 = r^2 with the half-b form of the quadratic
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return HitRecord::miss();
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return HitRecord::miss();
            }
        }

        // A grazing root admitted by rounding can sit just outside the
        // bounds; a sphere never reports a hit its own box rejects.
        if !self.bbox.hit(ray, Interval::from_min(ray_t.min)) {
            return HitRecord::miss();
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        HitRecord::new(ray, root, outward_normal, &self.material)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
