//! Camera for ray generation.

use crate::sampling::random_in_unit_disk;
use crate::SceneError;
use glint_math::{try_unit, Ray, Vec3};
use rand::RngCore;
use serde::Deserialize;

/// Camera placement and lens parameters, validated by [`CameraSettings::build`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Image width over height
    pub aspect_ratio: f32,
    /// Radius of the lens disk; 0 gives a pinhole camera
    pub lens_radius: f32,
}

impl CameraSettings {
    pub fn new() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            lens_radius: 0.0,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, lens_radius: f32) -> Self {
        self.vfov = vfov;
        self.lens_radius = lens_radius;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Compute the film plane.
    ///
    /// The film passes through `look_at`, so objects at that distance are
    /// in perfect focus when the lens radius is non-zero.
    pub fn build(&self) -> Result<Camera, SceneError> {
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(SceneError::DegenerateCamera(
                "field of view must be within (0, 180) degrees",
            ));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(SceneError::DegenerateCamera("aspect ratio must be positive"));
        }
        if !(self.lens_radius.is_finite() && self.lens_radius >= 0.0) {
            return Err(SceneError::DegenerateCamera("lens radius must not be negative"));
        }

        let vision = self.look_at - self.look_from;
        let w = try_unit(vision)
            .ok_or(SceneError::DegenerateCamera("look-from and look-at coincide"))?;
        // Gram-Schmidt the up vector against the view direction
        let viewup_unit = try_unit(self.vup - w * self.vup.dot(w)).ok_or(
            SceneError::DegenerateCamera("view-up is parallel to the view direction"),
        )?;
        let horizon_unit = w.cross(viewup_unit);

        let half_height = (self.vfov.to_radians() / 2.0).tan() * vision.length();
        let half_width = half_height * self.aspect_ratio;

        let horizontal = horizon_unit * (2.0 * half_width);
        let vertical = viewup_unit * (2.0 * half_height);

        Ok(Camera {
            origin: self.look_from,
            lower_left_corner: self.look_at - horizontal / 2.0 - vertical / 2.0,
            horizontal,
            vertical,
            horizon_unit,
            viewup_unit,
            lens_radius: self.lens_radius,
        })
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps film coordinates to rays. Immutable once built.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    horizon_unit: Vec3,
    viewup_unit: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Ray through film coordinates `(s, t)`, where `(0, 0)` is the lower-left
    /// corner and `(1, 1)` the upper-right.
    ///
    /// The origin is jittered over the lens disk; a zero lens radius always
    /// shoots from the eye point.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let origin = if self.lens_radius <= 0.0 {
            self.origin
        } else {
            let lens = self.lens_radius * random_in_unit_disk(rng);
            self.origin + lens.x * self.horizon_unit + lens.y * self.viewup_unit
        };

        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(origin, target - origin)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}
