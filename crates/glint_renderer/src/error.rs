//! Error types for scene construction and rendering.

use thiserror::Error;

/// A scene element violated a construction-time precondition.
///
/// The tracer itself never recovers from degenerate geometry, so these are
/// raised while the scene is being assembled.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("sphere radius must be positive and finite, got {0}")]
    DegenerateSphere(f32),

    #[error("sphere center must be finite")]
    NonFiniteCenter,

    #[error("refractive index must be positive and finite, got {0}")]
    InvalidRefractiveIndex(f32),

    #[error("degenerate camera: {0}")]
    DegenerateCamera(&'static str),

    #[error("cannot build a BVH over an empty primitive set")]
    EmptyScene,
}

/// Errors raised by the render driver and image output.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("render cancelled after {rows_done} of {rows} rows")]
    Cancelled { rows_done: usize, rows: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}
