//! Glint math types.
//!
//! Vectors come straight from glam; this crate adds the handful of
//! geometric types the path tracer shares between its crates: rays,
//! parameter intervals and axis-aligned bounding boxes.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Squared length below which a vector is treated as zero.
pub const DEGENERATE_LENGTH_SQUARED: f32 = 1e-12;

/// Normalize `v`, or `None` when it has no usable direction.
///
/// `Vec3::normalize` silently produces NaNs for a zero vector, so every
/// construction-time caller goes through this instead.
#[inline]
pub fn try_unit(v: Vec3) -> Option<Vec3> {
    if !v.is_finite() || v.length_squared() < DEGENERATE_LENGTH_SQUARED {
        return None;
    }
    Some(v / v.length())
}
