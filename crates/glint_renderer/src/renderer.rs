//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Depth-bounded path walking with a running throughput
//! - Anti-aliasing via multi-sampling
//! - Row-parallel rendering with one deterministic random stream per row

use crate::{Camera, Color, Hittable, RenderError};
use glint_math::{Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

/// Closest hit distance accepted after a bounce; keeps a scattered ray
/// from re-hitting the surface it just left.
pub const RAY_EPSILON: f32 = 0.001;

const SKY_WHITE: Color = Color::new(1.0, 1.0, 1.0);
const SKY_BLUE: Color = Color::new(0.5, 0.7, 1.0);

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of ray segments traced per sample
    pub max_depth: u32,
    /// Base seed; row `r` draws from a stream derived from `seed` and `r`
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 675,
            samples_per_pixel: 100,
            max_depth: 10,
            seed: 0,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples per pixel must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Compute the color seen by a ray.
///
/// Walks at most `max_depth` segments. Each scatter multiplies the running
/// throughput by the material's attenuation; escaping to the sky returns
/// the throughput times the background, while absorption or running out
/// of depth returns black.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, max_depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..max_depth {
        let rec = world.hit(&ray, Interval::from_min(RAY_EPSILON));
        if !rec.is_hit() {
            return throughput * sky_gradient(&ray);
        }

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            None => return Color::ZERO,
        }
    }

    Color::ZERO
}

/// Background: white at the horizon below, sky blue straight up.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    SKY_WHITE * (1.0 - a) + SKY_BLUE * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
///
/// Each channel is `round(255 * sqrt(v))`, clamped to `[0, 255]`.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let encode = |v: f32| (255.0 * linear_to_gamma(v).clamp(0.0, 1.0)).round() as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}

/// Inverse of [`color_to_rgb`] for one channel, up to quantization.
pub fn gamma_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    v * v
}

/// Render a single pixel with multi-sampling.
///
/// `row` 0 is the top of the image.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    col: u32,
    row: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let width = config.width as f32;
    let height = config.height as f32;
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let s = (col as f32 + crate::gen_f32(rng)) / width;
        let t = 1.0 - (row as f32 + crate::gen_f32(rng)) / height;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Linear color image, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Gamma-corrected RGB bytes, top row first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgb(*c)).collect()
    }
}

/// Independent, reproducible stream for one image row.
pub fn row_rng(seed: u64, row: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add((row as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)))
}

/// Render the entire scene to an image buffer.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> Result<ImageBuffer, RenderError> {
    render_with_cancel(camera, world, config, &AtomicBool::new(false))
}

/// Render, giving up at the next row boundary once `cancel` is set.
///
/// Rows are rendered in parallel; each row writes only its own slice of
/// the buffer, so no locking is involved.
pub fn render_with_cancel(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> Result<ImageBuffer, RenderError> {
    config.validate()?;

    let width = config.width as usize;
    let rows = config.height as usize;
    let report_every = (rows / 10).max(1);
    let rows_done = AtomicUsize::new(0);
    let mut image = ImageBuffer::new(config.width, config.height);

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth
    );
    let start = Instant::now();

    image
        .pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out)| {
            if cancel.load(Ordering::Relaxed) {
                return;
            }

            let mut rng = row_rng(config.seed, row);
            for (col, pixel) in out.iter_mut().enumerate() {
                *pixel = render_pixel(camera, world, col as u32, row as u32, config, &mut rng);
            }

            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            if done % report_every == 0 {
                log::info!("{}/{} rows ({:.0}%)", done, rows, 100.0 * done as f32 / rows as f32);
            }
        });

    let rows_done = rows_done.into_inner();
    if rows_done < rows {
        log::warn!("Render cancelled after {} of {} rows", rows_done, rows);
        return Err(RenderError::Cancelled { rows_done, rows });
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}
