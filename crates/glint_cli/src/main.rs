mod cli;
mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use glint_core::SceneDescription;
use glint_math::Camera;
use glint_renderer::{
    build_scene, demo_camera, demo_scene, render, FrameBuffer, RenderConfig, RenderControl, Scene,
};

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;

/// Load the requested scene, or the demo scene.
fn load(args: &Args) -> Result<(Scene, Camera)> {
    let Some(path) = &args.scene else {
        log::info!("No scene given, rendering the demo scene");
        let width = args.width.unwrap_or(DEFAULT_WIDTH);
        let height = args.height.unwrap_or(DEFAULT_HEIGHT);
        return Ok((demo_scene(), demo_camera(width, height)));
    };

    let mut desc = SceneDescription::from_file(path)
        .with_context(|| format!("Failed to load scene {}", path.display()))?;
    desc.width = args.width.unwrap_or(desc.width);
    desc.height = args.height.unwrap_or(desc.height);
    desc.validate()?;

    let scene = build_scene(&desc).with_context(|| format!("Failed to build scene {}", path.display()))?;
    Ok((scene, desc.camera()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.log_level.into());

    let (mut scene, camera) = load(&args)?;
    if let Some(depth) = args.max_depth {
        scene.max_rec_level = depth;
    }

    let mut config = RenderConfig::default()
        .with_debug(args.debug)
        .with_supersample(args.supersample);
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }

    let mut frame = FrameBuffer::new(camera.frame_width, camera.frame_height);
    let control = RenderControl::new();
    let stats = render(&scene, &camera, &mut frame, &control, &config).context("Render failed")?;

    frame
        .to_rgba_image()
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    log::info!(
        "Saved {} ({}x{}, {} threads, {:.2?})",
        args.output.display(),
        frame.width(),
        frame.height(),
        stats.threads,
        stats.elapsed
    );
    Ok(())
}
