//! Built-in scenes.
//!
//! Scene assembly sits outside the tracing core: it only creates
//! primitives, materials and camera settings, then hands them over
//! read-only.

use crate::sampling::{gen_f32, random_vec3};
use crate::{BvhNode, CameraSettings, Color, HittableList, Material, Object, SceneError, Sphere};
use glint_math::Vec3;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;

/// Half-width of the grid of small spheres in [`random_spheres`].
const GRID_HALF_EXTENT: i32 = 11;

/// A world plus the camera placement that frames it.
pub struct Scene {
    pub world: Object,
    /// Aspect ratio is left for the caller to set from the image size.
    pub camera: CameraSettings,
}

impl Scene {
    /// Number of primitives reachable from the root.
    pub fn primitive_count(&self) -> usize {
        count_primitives(&self.world)
    }
}

fn count_primitives(object: &Object) -> usize {
    match object {
        Object::Sphere(_) => 1,
        Object::List(list) => list.objects().iter().map(count_primitives).sum(),
        Object::Bvh(node) => count_primitives(node.left()) + count_primitives(node.right()),
    }
}

/// Wrap the primitives either in a BVH or a flat list.
///
/// Both answer every ray identically; the flag only trades build time for
/// trace time.
pub fn assemble(list: HittableList, use_bvh: bool) -> Result<Object, SceneError> {
    if use_bvh {
        BvhNode::from_list(list)
    } else {
        Ok(Object::List(list))
    }
}

/// Material for one of the small spheres: matte, metal or glass with equal odds.
fn random_material(rng: &mut dyn RngCore) -> Result<Material, SceneError> {
    let kind = (gen_f32(rng) * 3.0) as u32;
    let fuzz = gen_f32(rng) / 2.0;
    let refractive_index = gen_f32(rng) + 1.0;
    let albedo = (random_vec3(rng) + 1.0) / 2.0;

    match kind {
        0 => Ok(Material::matte(albedo)),
        1 => Ok(Material::metal(albedo, fuzz)),
        _ => Material::glass(albedo, fuzz, refractive_index),
    }
}

/// The classic cover scene: a 22x22 grid of small random spheres on a huge
/// ground sphere, plus glass, matte and metal feature spheres.
pub fn random_spheres(seed: u64, use_bvh: bool) -> Result<Scene, SceneError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut list = HittableList::new();

    for i in -GRID_HALF_EXTENT..GRID_HALF_EXTENT {
        for j in -GRID_HALF_EXTENT..GRID_HALF_EXTENT {
            let center = Vec3::new(
                i as f32 + 0.9 * gen_f32(&mut rng),
                0.2,
                j as f32 + 0.9 * gen_f32(&mut rng),
            );
            let material = random_material(&mut rng)?;
            list.add(Sphere::new(center, 0.2, Arc::new(material))?);
        }
    }

    list.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Material::matte(Color::splat(0.9))),
    )?);
    list.add(Sphere::new(
        Vec3::Y,
        1.0,
        Arc::new(Material::glass(Color::ONE, 0.0, 1.5)?),
    )?);
    list.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::matte(Color::new(0.4, 0.2, 0.1))),
    )?);
    list.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0)),
    )?);

    log::info!(
        "Built random sphere scene: {} primitives ({})",
        list.len(),
        if use_bvh { "bvh" } else { "list" }
    );

    Ok(Scene {
        world: assemble(list, use_bvh)?,
        camera: CameraSettings::new()
            .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(30.0, 0.0),
    })
}

/// One matte unit sphere at the origin, seen straight down the -Z axis.
pub fn single_sphere() -> Result<Scene, SceneError> {
    let mut list = HittableList::new();
    list.add(Sphere::new(
        Vec3::ZERO,
        1.0,
        Arc::new(Material::matte(Color::new(0.7, 0.3, 0.3))),
    )?);

    Ok(Scene {
        world: Object::List(list),
        camera: CameraSettings::new()
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_lens(30.0, 0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hittable;
    use glint_math::{Interval, Ray};

    #[test]
    fn test_random_spheres_population() {
        let scene = random_spheres(3, true).unwrap();
        assert_eq!(scene.primitive_count(), 22 * 22 + 4);
        assert!(matches!(scene.world, Object::Bvh(_)));

        let flat = random_spheres(3, false).unwrap();
        assert_eq!(flat.primitive_count(), 22 * 22 + 4);
        assert!(matches!(flat.world, Object::List(_)));
    }

    #[test]
    fn test_primitive_count_descends_into_nested_aggregates() {
        let material = Arc::new(Material::matte(Color::splat(0.5)));
        let sphere =
            |x: f32| Sphere::new(Vec3::new(x, 0.0, 0.0), 0.5, Arc::clone(&material)).unwrap();

        let tree = BvhNode::build((0..3).map(|i| Object::from(sphere(i as f32 * 2.0))).collect())
            .unwrap();
        let mut inner = HittableList::new();
        inner.add(sphere(10.0));
        inner.add(sphere(12.0));

        let mut outer = HittableList::new();
        outer.add(tree);
        outer.add(inner);
        outer.add(sphere(-4.0));

        let scene = Scene {
            world: Object::List(outer),
            camera: CameraSettings::new(),
        };
        assert_eq!(scene.primitive_count(), 6);
    }

    #[test]
    fn test_random_spheres_list_and_bvh_agree() {
        let bvh = random_spheres(17, true).unwrap();
        let list = random_spheres(17, false).unwrap();
        let camera = bvh.camera.with_aspect_ratio(16.0 / 9.0).build().unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        for i in 0..60 {
            for j in 0..30 {
                let ray = camera.get_ray(i as f32 / 59.0, j as f32 / 29.0, &mut rng);
                let a = bvh.world.hit(&ray, Interval::from_min(0.001));
                let b = list.world.hit(&ray, Interval::from_min(0.001));
                assert_eq!(a.t, b.t);
                assert_eq!(a.p, b.p);
                if a.is_hit() {
                    assert!(std::ptr::eq(a.material, b.material));
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_scene() {
        let a = random_spheres(5, false).unwrap();
        let b = random_spheres(5, false).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 0.2, 20.0), Vec3::NEG_Z);

        let hit_a = a.world.hit(&ray, Interval::from_min(0.001));
        let hit_b = b.world.hit(&ray, Interval::from_min(0.001));
        assert_eq!(hit_a.t, hit_b.t);
    }

    #[test]
    fn test_random_materials_are_valid() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..500 {
            let material = random_material(&mut rng).unwrap();
            let albedo = material.albedo();
            assert!(albedo.min_element() >= 0.5 && albedo.max_element() <= 1.0);
            match material {
                Material::Metal(metal) => assert!(metal.fuzz() <= 0.5),
                Material::Glass(glass) => {
                    assert!((1.0..2.0).contains(&glass.refractive_index()))
                }
                Material::Matte(_) => {}
            }
        }
    }

    #[test]
    fn test_single_sphere_is_centered() {
        let scene = single_sphere().unwrap();
        let camera = scene.camera.with_aspect_ratio(1.0).build().unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let rec = scene.world.hit(&camera.get_ray(0.5, 0.5, &mut rng), Interval::from_min(0.001));
        assert!(rec.is_hit());
        assert!((rec.t - 0.8).abs() < 1e-4);
    }
}
