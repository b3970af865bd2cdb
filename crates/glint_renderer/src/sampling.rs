//! Random sampling helpers shared by materials and the camera.
//!
//! Every function takes the caller's generator explicitly; there is no
//! global random state.

use glint_math::Vec3;
use rand::{Rng, RngCore};

/// Upper bound on rejection-sampling draws.
///
/// A cube draw lands inside the unit sphere with probability ~0.52 (the
/// disk case is ~0.79), so running out of attempts means the generator is
/// broken rather than unlucky.
pub const MAX_REJECTION_ATTEMPTS: usize = 64;

/// Uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform float in `[-1, 1)`.
#[inline]
fn gen_signed(rng: &mut dyn RngCore) -> f32 {
    gen_f32(rng) * 2.0 - 1.0
}

/// Random point strictly inside the unit sphere.
///
/// Draws from the cube `[-1, 1)^3` and redraws until `len^2 < 1`.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    for _ in 0..MAX_REJECTION_ATTEMPTS {
        let p = Vec3::new(gen_signed(rng), gen_signed(rng), gen_signed(rng));
        if p.length_squared() < 1.0 {
            return p;
        }
    }
    panic!("unit sphere sampling rejected {MAX_REJECTION_ATTEMPTS} draws in a row");
}

/// Random point strictly inside the unit disk in the XY plane (z = 0).
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    for _ in 0..MAX_REJECTION_ATTEMPTS {
        let p = Vec3::new(gen_signed(rng), gen_signed(rng), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
    panic!("unit disk sampling rejected {MAX_REJECTION_ATTEMPTS} draws in a row");
}

/// Random vector with each component uniform in `[0, 1)`.
pub fn random_vec3(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng))
}
