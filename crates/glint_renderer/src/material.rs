//! Surface scattering models.
//!
//! Materials form a closed set: matte (diffuse), metal (reflective with
//! roughness) and glass (dielectric). Primitives share them through
//! `Arc<Material>`, and nothing mutates a material once the scene is built.

use crate::hittable::HitRecord;
use crate::sampling::{gen_f32, random_in_unit_sphere};
use crate::SceneError;
use glint_math::{try_unit, Ray, Vec3};
use rand::RngCore;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// The outcome of a ray that was not absorbed.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel fraction of the scattered radiance that survives.
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Diffuse surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Matte {
    albedo: Color,
}

impl Matte {
    pub const fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    /// Scatter toward `normal + random point in the unit sphere`.
    ///
    /// This leans scattered rays toward the normal (roughly cosine-weighted)
    /// and never absorbs.
    fn scatter(&self, rec: &HitRecord<'_>, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_in_unit_sphere(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Mirror-like surface; `fuzz` blurs the reflection.
#[derive(Debug, Clone, PartialEq)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough (clamped)
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: clamp_fuzz(fuzz),
        }
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzzed below the surface: absorbed
        if scattered_dir.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scattered_dir),
        })
    }
}

/// Transparent surface that refracts or reflects.
#[derive(Debug, Clone, PartialEq)]
pub struct Glass {
    albedo: Color,
    fuzz: f32,
    refractive_index: f32,
}

impl Glass {
    /// - `albedo`: tint, usually white
    /// - `fuzz`: blur applied to both reflected and refracted rays (clamped to [0, 1])
    /// - `refractive_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(albedo: Color, fuzz: f32, refractive_index: f32) -> Result<Self, SceneError> {
        if !(refractive_index.is_finite() && refractive_index > 0.0) {
            return Err(SceneError::InvalidRefractiveIndex(refractive_index));
        }
        Ok(Self {
            albedo,
            fuzz: clamp_fuzz(fuzz),
            refractive_index,
        })
    }

    pub fn refractive_index(&self) -> f32 {
        self.refractive_index
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // (index of the medium being left) / (index of the medium being entered)
        let ratio = if rec.front_face {
            1.0 / self.refractive_index
        } else {
            self.refractive_index
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        let cannot_refract = ratio * sin_theta > 1.0;
        let direction = if cannot_refract || schlick_reflectance(cos_theta, ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, ratio)
        };

        let blurred = direction + self.fuzz * random_in_unit_sphere(rng);
        let direction = try_unit(blurred).unwrap_or(direction);

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// A surface material.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Matte(Matte),
    Metal(Metal),
    Glass(Glass),
}

impl Material {
    pub fn matte(albedo: Color) -> Self {
        Material::Matte(Matte::new(albedo))
    }

    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal(Metal::new(albedo, fuzz))
    }

    pub fn glass(albedo: Color, fuzz: f32, refractive_index: f32) -> Result<Self, SceneError> {
        Glass::new(albedo, fuzz, refractive_index).map(Material::Glass)
    }

    /// Scatter an incoming ray at a hit point.
    ///
    /// Returns `None` when the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Matte(matte) => matte.scatter(rec, rng),
            Material::Metal(metal) => metal.scatter(ray_in, rec, rng),
            Material::Glass(glass) => glass.scatter(ray_in, rec, rng),
        }
    }

    pub fn albedo(&self) -> Color {
        match self {
            Material::Matte(matte) => matte.albedo,
            Material::Metal(metal) => metal.albedo,
            Material::Glass(glass) => glass.albedo,
        }
    }
}

impl From<Matte> for Material {
    fn from(matte: Matte) -> Self {
        Material::Matte(matte)
    }
}

impl From<Metal> for Material {
    fn from(metal: Metal) -> Self {
        Material::Metal(metal)
    }
}

impl From<Glass> for Material {
    fn from(glass: Glass) -> Self {
        Material::Glass(glass)
    }
}

// =============================================================================
// Helper functions
// =============================================================================

fn clamp_fuzz(fuzz: f32) -> f32 {
    if fuzz.is_nan() {
        0.0
    } else {
        fuzz.clamp(0.0, 1.0)
    }
}

/// Schlick's approximation of Fresnel reflectance.
///
/// `ratio` is the relative refractive index across the surface; the base
/// reflectance is the same whichever way it is expressed, so `ratio` and
/// `1 / ratio` give identical results.
#[inline]
pub fn schlick_reflectance(cosine: f32, ratio: f32) -> f32 {
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with unit normal `n`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
