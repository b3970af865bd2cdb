//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of axis-aligned boxes whose leaves are the primitives
//! themselves. It answers exactly the same queries as a [`HittableList`]
//! over the same primitives; it only skips the subtrees a ray cannot reach.
//!
//! One caveat: when two surfaces coincide and are hit at exactly the same
//! `t`, a list returns the primitive inserted first while the tree returns
//! whichever it visits first. The hit distance is the same either way.
//!
//! [`HittableList`]: crate::HittableList

use crate::{HitRecord, Hittable, HittableList, Object, SceneError};
use glint_math::{Aabb, Interval, Ray};

/// Interior node of the hierarchy.
///
/// `bbox` is the union of both children's boxes, computed once when the
/// node is built.
pub struct BvhNode {
    left: Box<Object>,
    right: Box<Object>,
    bbox: Aabb,
    /// Axis the children were split along; `left` holds the smaller centroids.
    axis: usize,
}

impl BvhNode {
    /// Join two subtrees split along `axis`.
    pub fn new(left: Object, right: Object, axis: usize) -> Self {
        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        Self {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
            axis: axis.min(2),
        }
    }

    /// Build a hierarchy over `objects`.
    ///
    /// A single object is returned as-is rather than wrapped in a node.
    pub fn build(objects: Vec<Object>) -> Result<Object, SceneError> {
        if objects.is_empty() {
            return Err(SceneError::EmptyScene);
        }

        let count = objects.len();
        let root = Self::build_recursive(objects);
        log::debug!(
            "Built BVH over {} objects, depth {}",
            count,
            tree_depth(&root)
        );
        Ok(root)
    }

    /// Build a hierarchy over the children of a list.
    pub fn from_list(list: HittableList) -> Result<Object, SceneError> {
        Self::build(list.into_objects())
    }

    /// Median split along the axis where the centroids spread the most.
    fn build_recursive(mut objects: Vec<Object>) -> Object {
        debug_assert!(!objects.is_empty());
        if objects.len() == 1 {
            return objects.swap_remove(0);
        }

        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb { min: c, max: c })
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        let mid = objects.len() / 2;
        let right_objects = objects.split_off(mid);

        let left = Self::build_recursive(objects);
        let right = Self::build_recursive(right_objects);

        Object::Bvh(BvhNode::new(left, right, axis))
    }

    pub fn left(&self) -> &Object {
        &self.left
    }

    pub fn right(&self) -> &Object {
        &self.right
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> HitRecord<'a> {
        if !self.bbox.hit(ray, ray_t) {
            return HitRecord::miss();
        }

        // Visit the child on the ray's side of the split first so its hit
        // can prune the other one.
        let (first, second) = if ray.direction()[self.axis] < 0.0 {
            (&self.right, &self.left)
        } else {
            (&self.left, &self.right)
        };

        let first_hit = first.hit(ray, ray_t);
        let second_hit = second.hit(ray, ray_t.with_max(first_hit.t.min(ray_t.max)));

        if second_hit.is_hit() {
            second_hit
        } else {
            first_hit
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

fn tree_depth(object: &Object) -> usize {
    match object {
        Object::Bvh(node) => 1 + tree_depth(&node.left).max(tree_depth(&node.right)),
        _ => 0,
    }
}
