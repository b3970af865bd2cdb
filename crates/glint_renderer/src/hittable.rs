//! Hittable trait and HitRecord for ray-object intersection.

use crate::{BvhNode, Material, Matte, Sphere};
use glint_math::{Aabb, Interval, Ray, Vec3};

/// Placeholder carried by miss records; never scattered against.
static MISS_MATERIAL: Material = Material::Matte(Matte::new(Vec3::ZERO));

/// Record of a ray-object intersection.
///
/// A miss is the record with `t == +inf`; no finite parameter can collide
/// with it, and its point, normal and material carry no meaning.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, always pointing against the incoming ray
    pub normal: Vec3,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Material at the intersection point
    pub material: &'a Material,
}

impl<'a> HitRecord<'a> {
    /// Build a hit from the geometric (outward) normal at `t`.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: &'a Material) -> Self {
        // If the ray and normal point in the same direction, we're inside
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            t,
            p: ray.at(t),
            normal,
            front_face,
            material,
        }
    }

    pub fn miss() -> Self {
        Self {
            t: f32::INFINITY,
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            front_face: false,
            material: &MISS_MATERIAL,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.t != f32::INFINITY
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `t` strictly inside `ray_t`, or a miss.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> HitRecord<'a>;

    /// A box that fully contains the object.
    fn bounding_box(&self) -> Aabb;
}

/// Anything that can sit in a scene: a primitive or an aggregate.
///
/// The set is closed so the BVH can dispatch with a `match` instead of a
/// virtual call per node.
pub enum Object {
    Sphere(Sphere),
    List(HittableList),
    Bvh(BvhNode),
}

impl Hittable for Object {
    #[inline]
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> HitRecord<'a> {
        match self {
            Object::Sphere(sphere) => sphere.hit(ray, ray_t),
            Object::List(list) => list.hit(ray, ray_t),
            Object::Bvh(node) => node.hit(ray, ray_t),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Object::Sphere(sphere) => sphere.bounding_box(),
            Object::List(list) => list.bounding_box(),
            Object::Bvh(node) => node.bounding_box(),
        }
    }
}

impl From<Sphere> for Object {
    fn from(sphere: Sphere) -> Self {
        Object::Sphere(sphere)
    }
}

impl From<HittableList> for Object {
    fn from(list: HittableList) -> Self {
        Object::List(list)
    }
}

impl From<BvhNode> for Object {
    fn from(node: BvhNode) -> Self {
        Object::Bvh(node)
    }
}

/// A list of hittable objects, tested by brute force.
pub struct HittableList {
    objects: Vec<Object>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Object>) {
        let object = object.into();
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Hand the children over, e.g. to build a BVH from them.
    pub fn into_objects(self) -> Vec<Object> {
        self.objects
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Object> for HittableList {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        let mut list = HittableList::new();
        for object in iter {
            list.add(object);
        }
        list
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> HitRecord<'a> {
        let mut closest = HitRecord::miss();
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            let rec = object.hit(ray, ray_t.with_max(closest_so_far));
            if rec.is_hit() {
                closest_so_far = rec.t;
                closest = rec;
            }
        }

        closest
    }

    /// Union of the children's boxes; [`Aabb::EMPTY`] for an empty list.
    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sphere(center: Vec3, radius: f32, material: &Arc<Material>) -> Sphere {
        Sphere::new(center, radius, Arc::clone(material)).unwrap()
    }

    #[test]
    fn test_miss_sentinel() {
        let miss = HitRecord::miss();
        assert!(!miss.is_hit());
        assert_eq!(miss.t, f32::INFINITY);

        let material = Material::matte(Vec3::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        for t in [0.0, 1e-30, 1.0, f32::MAX] {
            assert!(HitRecord::new(&ray, t, Vec3::NEG_Z, &material).is_hit());
        }
    }

    #[test]
    fn test_face_normal_points_against_ray() {
        let material = Material::matte(Vec3::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let outside = HitRecord::new(&ray, 1.0, Vec3::NEG_Z, &material);
        assert!(outside.front_face);
        assert_eq!(outside.normal, Vec3::NEG_Z);

        let inside = HitRecord::new(&ray, 1.0, Vec3::Z, &material);
        assert!(!inside.front_face);
        assert_eq!(inside.normal, Vec3::NEG_Z);
        assert_eq!(inside.p, Vec3::Z);
    }

    #[test]
    fn test_list_returns_closest_hit() {
        let near = Arc::new(Material::matte(Vec3::new(1.0, 0.0, 0.0)));
        let far = Arc::new(Material::matte(Vec3::new(0.0, 1.0, 0.0)));

        let mut list = HittableList::new();
        // Insert the far sphere first so order cannot decide the result.
        list.add(sphere(Vec3::new(0.0, 0.0, -10.0), 1.0, &far));
        list.add(sphere(Vec3::new(0.0, 0.0, -4.0), 1.0, &near));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = list.hit(&ray, Interval::from_min(0.001));

        assert!(rec.is_hit());
        assert!((rec.t - 3.0).abs() < 1e-5);
        assert!(std::ptr::eq(rec.material, near.as_ref()));
    }

    #[test]
    fn test_list_respects_interval() {
        let material = Arc::new(Material::matte(Vec3::ONE));
        let list: HittableList = [sphere(Vec3::new(0.0, 0.0, -4.0), 1.0, &material)]
            .into_iter()
            .map(Object::from)
            .collect();

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(!list.hit(&ray, Interval::new(0.001, 2.0)).is_hit());
        assert!(list.hit(&ray, Interval::new(0.001, 3.5)).is_hit());
    }

    #[test]
    fn test_list_bounds_are_union() {
        let material = Arc::new(Material::matte(Vec3::ONE));
        let mut list = HittableList::new();
        assert!(list.is_empty());
        assert_eq!(list.bounding_box(), Aabb::EMPTY);

        list.add(sphere(Vec3::new(-2.0, 0.0, 0.0), 1.0, &material));
        list.add(sphere(Vec3::new(3.0, 1.0, 0.0), 0.5, &material));

        let bbox = list.bounding_box();
        assert_eq!(list.len(), 2);
        assert_eq!(bbox.min, Vec3::new(-3.0, -1.0, -1.0));
        assert_eq!(bbox.max, Vec3::new(3.5, 1.5, 1.0));
    }

    #[test]
    fn test_empty_list_misses() {
        let list = HittableList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(!list.hit(&ray, Interval::from_min(0.001)).is_hit());
    }
}
