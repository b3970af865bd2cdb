//! Simple path tracer example.
//!
//! Renders three spheres (glass, matte, metal) on a ground sphere and saves
//! to PPM format.
//!
//! ```text
//! cargo run --release -p glint_renderer --example simple_render
//! ```

use glint_renderer::{
    render, scenes, CameraSettings, Color, HittableList, Material, RenderConfig, Sphere, Vec3,
};
use std::error::Error;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let world = scenes::assemble(build_scene()?, true)?;

    let config = RenderConfig {
        width: 400,
        height: 225,
        samples_per_pixel: 32,
        max_depth: 10,
        seed: 7,
    };

    let camera = CameraSettings::new()
        .with_position(Vec3::new(0.0, 2.0, 10.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y)
        .with_lens(35.0, 0.05)
        .with_aspect_ratio(config.aspect_ratio())
        .build()?;

    let image = render(&camera, &world, &config)?;
    image.save("output.ppm")?;
    Ok(())
}

fn build_scene() -> Result<HittableList, Box<dyn Error>> {
    let mut world = HittableList::new();

    // Ground
    world.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Material::matte(Color::splat(0.5))),
    )?);

    world.add(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::glass(Color::ONE, 0.0, 1.5)?),
    )?);
    world.add(Sphere::new(
        Vec3::new(-2.2, 1.0, 0.0),
        1.0,
        Arc::new(Material::matte(Color::new(0.4, 0.2, 0.1))),
    )?);
    world.add(Sphere::new(
        Vec3::new(2.2, 1.0, 0.0),
        1.0,
        Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.1)),
    )?);

    Ok(world)
}
