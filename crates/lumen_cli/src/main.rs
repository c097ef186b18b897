//! lumen: render a built-in scene with the CPU path tracer.

mod scenes;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_renderer::{
    render, render_parallel, save_image, Background, CameraConfig, CancelToken, ImageBuffer,
    RenderConfig, World,
};
use serde::Deserialize;

use crate::scenes::SceneKind;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "lumen")]
#[command(version)]
#[command(about = "Monte Carlo path tracer for spheres and planes")]
struct Cli {
    /// Scene to render
    #[arg(long, value_enum, default_value = "three-spheres")]
    scene: SceneKind,

    /// Output file (.ppm for ASCII PPM, otherwise PNG/BMP/... by extension)
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// JSON settings file with optional `render`, `camera` and `background` sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(short, long)]
    samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(short, long)]
    depth: Option<u32>,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Render on the calling thread in raster order
    #[arg(long)]
    sequential: bool,

    /// Logging level (RUST_LOG still applies to individual modules)
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

/// Contents of a `--config` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    render: RenderConfig,
    camera: Option<CameraConfig>,
    background: Option<Background>,
}

impl Settings {
    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    /// Command-line flags win over the file.
    fn apply_overrides(&mut self, cli: &Cli) {
        let render = &mut self.render;
        if let Some(width) = cli.width {
            render.image_width = width;
        }
        if let Some(height) = cli.height {
            render.image_height = height;
        }
        if let Some(samples) = cli.samples {
            render.samples_per_pixel = samples;
        }
        if let Some(depth) = cli.depth {
            render.max_depth = depth;
        }
        if let Some(seed) = cli.seed {
            render.seed = seed;
        }
    }

    fn apply_background(&self, world: &mut World) {
        if let Some(background) = self.background {
            world.set_background(background);
        }
    }
}

fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level.into());

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.apply_overrides(&cli);
    let config = settings.render.clone();
    config.validate().context("Invalid render settings")?;

    let mut scene = scenes::build(cli.scene, config.seed);
    settings.apply_background(&mut scene.world);
    log::info!("Built scene {:?} with {} objects", cli.scene, scene.world.len());

    let camera = settings
        .camera
        .unwrap_or(scene.camera)
        .with_aspect_ratio(config.aspect_ratio())
        .build();

    let mut image = ImageBuffer::new(config.image_width, config.image_height);
    let cancel = CancelToken::new();
    let stats = if cli.sequential {
        render(&camera, &scene.world, &config, &mut image, &cancel)
    } else {
        render_parallel(&camera, &scene.world, &config, &mut image, &cancel)
    }
    .context("Render failed")?;

    let rays_per_sec = stats.samples as f64 / stats.elapsed.as_secs_f64().max(1e-9);
    log::info!(
        "{} camera rays in {:.2?} ({:.0} rays/s)",
        stats.samples,
        stats.elapsed,
        rays_per_sec
    );

    save_image(&image, &cli.output)
        .with_context(|| format!("Failed to save {}", cli.output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::Color;

    #[test]
    fn test_settings_parse_partial_file() {
        let settings: Settings = serde_json::from_str(
            r#"{
                "render": { "image_width": 64, "samples_per_pixel": 8 },
                "camera": { "look_from": [1.0, 2.0, 3.0], "vfov": 35.0 },
                "background": { "solid": [0.0, 0.0, 0.0] }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.render.image_width, 64);
        assert_eq!(settings.render.samples_per_pixel, 8);
        assert_eq!(settings.render.image_height, RenderConfig::default().image_height);

        let camera = settings.camera.unwrap();
        assert_eq!(camera.vfov, 35.0);
        assert_eq!(camera.look_at, CameraConfig::default().look_at);
        assert_eq!(settings.background, Some(Background::Solid(Color::ZERO)));
    }

    #[test]
    fn test_settings_background_replaces_scene_background() {
        let settings: Settings =
            serde_json::from_str(r#"{ "background": "sky_gradient" }"#).unwrap();
        let mut scene = scenes::build(SceneKind::LitPlane, 0);
        assert_eq!(scene.world.background(), Background::Solid(Color::ZERO));

        settings.apply_background(&mut scene.world);
        assert_eq!(scene.world.background(), Background::SkyGradient);
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from(["lumen", "--width", "32", "--seed", "9", "-s", "4"]);
        let mut settings = Settings::default();
        settings.render.image_height = 18;
        settings.apply_overrides(&cli);

        assert_eq!(settings.render.image_width, 32);
        assert_eq!(settings.render.image_height, 18);
        assert_eq!(settings.render.samples_per_pixel, 4);
        assert_eq!(settings.render.seed, 9);
    }

    #[test]
    fn test_cli_parses_scene_names() {
        let cli = Cli::parse_from(["lumen", "--scene", "lit-plane", "--sequential"]);
        assert_eq!(cli.scene, SceneKind::LitPlane);
        assert!(cli.sequential);
    }
}
