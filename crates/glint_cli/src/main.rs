use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glint_renderer::scenes::{self, Scene};
use glint_renderer::{render_with_cancel, Camera, Object, RenderConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
enum SceneKind {
    /// Grid of random small spheres around three large ones
    #[default]
    Random,
    /// One matte sphere at the origin
    Single,
}

/// Everything a render needs, as read from a settings file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
struct Settings {
    scene: SceneKind,
    render: RenderConfig,
    /// Lens radius; the scene's own value when unset
    aperture: Option<f32>,
    /// Vertical field of view in degrees; the scene's own value when unset
    fov: Option<f32>,
    bvh: bool,
    output: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene: SceneKind::default(),
            render: RenderConfig::default(),
            aperture: None,
            fov: None,
            bvh: true,
            output: PathBuf::from("render.png"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "glint", version, about = "Offline CPU path tracer for spheres")]
struct CliArguments {
    /// Built-in scene to render
    #[arg(long, value_enum)]
    scene: Option<SceneKind>,

    #[arg(short = 'W', long)]
    width: Option<u32>,

    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(short = 's', long)]
    samples: Option<u32>,

    /// Maximum ray depth
    #[arg(short = 'd', long)]
    depth: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Lens radius; 0 renders with a pinhole camera
    #[arg(long)]
    aperture: Option<f32>,

    /// Vertical field of view in degrees
    #[arg(long)]
    fov: Option<f32>,

    /// Trace against a flat list instead of a BVH
    #[arg(long, action)]
    no_bvh: bool,

    /// JSON settings file; explicit flags take precedence
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output image; `.ppm` writes plain-text PPM, other extensions use the
    /// matching image encoder
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

impl CliArguments {
    /// Overlay the flags that were given on top of `settings`.
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(scene) = self.scene {
            settings.scene = scene;
        }
        if let Some(width) = self.width {
            settings.render.width = width;
        }
        if let Some(height) = self.height {
            settings.render.height = height;
        }
        if let Some(samples) = self.samples {
            settings.render.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            settings.render.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            settings.render.seed = seed;
        }
        if self.aperture.is_some() {
            settings.aperture = self.aperture;
        }
        if self.fov.is_some() {
            settings.fov = self.fov;
        }
        if self.no_bvh {
            settings.bvh = false;
        }
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        settings
    }

    fn settings(&self) -> Result<Settings> {
        let base = match &self.config {
            Some(path) => load_settings(path)?,
            None => Settings::default(),
        };
        Ok(self.apply(base))
    }
}

fn load_settings(path: &Path) -> Result<Settings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))
}

fn build_scene(settings: &Settings) -> Result<(Object, Camera)> {
    let start = Instant::now();
    let Scene { world, camera } = match settings.scene {
        SceneKind::Random => scenes::random_spheres(settings.render.seed, settings.bvh),
        SceneKind::Single => scenes::single_sphere(),
    }
    .context("Failed to build scene")?;

    let mut camera = camera.with_aspect_ratio(settings.render.aspect_ratio());
    if let Some(fov) = settings.fov {
        camera.vfov = fov;
    }
    if let Some(aperture) = settings.aperture {
        camera.lens_radius = aperture;
    }
    let camera = camera.build().context("Invalid camera settings")?;

    log::info!("Scene built in {:?}", start.elapsed());
    Ok((world, camera))
}

fn run(settings: &Settings, cancel: &AtomicBool) -> Result<()> {
    let (world, camera) = build_scene(settings)?;
    let image = render_with_cancel(&camera, &world, &settings.render, cancel)?;
    image
        .save(&settings.output)
        .with_context(|| format!("Failed to write {}", settings.output.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = CliArguments::parse();
    let settings = args.settings()?;
    log::debug!("{:?}", settings);

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let handler_cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || {
            log::warn!("Interrupted, stopping after the rows in flight");
            handler_cancel.store(true, Ordering::Relaxed);
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    run(&settings, &cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> CliArguments {
        CliArguments::try_parse_from(std::iter::once("glint").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let settings = parse(&[]).settings().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.render.width, 1200);
        assert_eq!(settings.render.height, 675);
        assert!(settings.bvh);
    }

    #[test]
    fn test_flags_override_defaults() {
        let settings = parse(&[
            "--scene", "single", "-W", "64", "-H", "32", "-s", "4", "-d", "3", "--seed", "9",
            "--aperture", "0.1", "--fov", "45", "--no-bvh", "-o", "out.ppm",
        ])
        .settings()
        .unwrap();

        assert_eq!(settings.scene, SceneKind::Single);
        assert_eq!(
            settings.render,
            RenderConfig {
                width: 64,
                height: 32,
                samples_per_pixel: 4,
                max_depth: 3,
                seed: 9,
            }
        );
        assert_eq!(settings.aperture, Some(0.1));
        assert_eq!(settings.fov, Some(45.0));
        assert!(!settings.bvh);
        assert_eq!(settings.output, PathBuf::from("out.ppm"));
    }

    #[test]
    fn test_settings_file_with_flag_overlay() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "scene": "single", "render": {{ "width": 100, "samples_per_pixel": 8 }}, "bvh": false }}"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let settings = parse(&["--config", path, "-W", "50"]).settings().unwrap();

        assert_eq!(settings.scene, SceneKind::Single);
        // Flag wins over the file, file wins over the defaults
        assert_eq!(settings.render.width, 50);
        assert_eq!(settings.render.samples_per_pixel, 8);
        assert_eq!(settings.render.height, 675);
        assert!(!settings.bvh);
    }

    #[test]
    fn test_bad_settings_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"scene\": \"teapot\" }}").unwrap();
        assert!(load_settings(file.path()).is_err());

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = load_settings(&missing).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_invalid_camera_override_is_rejected() {
        let settings = Settings {
            scene: SceneKind::Single,
            fov: Some(0.0),
            ..Settings::default()
        };
        assert!(build_scene(&settings).is_err());
    }

    #[test]
    fn test_run_writes_image() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("single.ppm");
        let settings = Settings {
            scene: SceneKind::Single,
            render: RenderConfig {
                width: 8,
                height: 6,
                samples_per_pixel: 2,
                max_depth: 4,
                seed: 1,
            },
            output: output.clone(),
            ..Settings::default()
        };

        run(&settings, &AtomicBool::new(false)).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("P3\n8 6\n255\n"));
        assert_eq!(text.lines().count(), 3 + 8 * 6);
    }

    #[test]
    fn test_run_cancelled_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("never.png");
        let settings = Settings {
            scene: SceneKind::Single,
            output: output.clone(),
            ..Settings::default()
        };

        assert!(run(&settings, &AtomicBool::new(true)).is_err());
        assert!(!output.exists());
    }
}
