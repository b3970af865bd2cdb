//! Glint renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for spheres with matte, metal and glass
//! materials, accelerated by a bounding volume hierarchy and parallelized
//! over image rows.

mod error;
mod sampling;
mod hittable;
mod material;
mod sphere;
mod camera;
mod bvh;
mod renderer;
mod output;
pub mod scenes;

pub use error::{RenderError, SceneError};
pub use sampling::{gen_f32, random_in_unit_disk, random_in_unit_sphere, random_vec3};
pub use hittable::{HitRecord, Hittable, HittableList, Object};
pub use material::{
    reflect, refract, schlick_reflectance, Color, Glass, Material, Matte, Metal, ScatterResult,
};
pub use sphere::Sphere;
pub use camera::{Camera, CameraSettings};
pub use bvh::BvhNode;
pub use renderer::{
    color_to_rgb, gamma_to_linear, linear_to_gamma, ray_color, render, render_pixel,
    render_with_cancel, row_rng, sky_gradient, ImageBuffer, RenderConfig, RAY_EPSILON,
};
pub use output::write_ppm;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{try_unit, Aabb, Interval, Ray, Vec3};
