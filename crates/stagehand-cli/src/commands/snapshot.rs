//! Headless wireframe snapshot

use super::load_or_studio;
use anyhow::{Context, Result};
use stagehand_interact::{ViewerConfig, Viewport};
use stagehand_viewer::screenshot::save_png;
use std::path::Path;

pub struct SnapshotArgs {
    pub scene: Option<String>,
    pub output: String,
    pub width: u32,
    pub height: u32,
    pub precision: Option<u32>,
    pub camera: Option<String>,
}

pub fn run(args: SnapshotArgs) -> Result<()> {
    let config = ViewerConfig::load().context("Failed to load viewer config")?;
    let precision = args.precision.unwrap_or(config.screenshot.precision).max(1);

    let (graph, scene) = load_or_studio(args.scene.as_deref())?;
    let size = [args.width as f32, args.height as f32];
    let mut viewport = Viewport::with_orbit_controls(graph, scene.scene, config, size)?;
    if let Some(camera) = &args.camera {
        viewport
            .select_camera(camera)
            .with_context(|| format!("Unknown camera '{}'", camera))?;
    }

    log::debug!(
        "snapshot through camera {} at precision {}",
        viewport.rigs().active().name,
        precision
    );
    let frame = viewport.frame_at([size[0] * precision as f32, size[1] * precision as f32]);
    let output = Path::new(&args.output);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    save_png(&frame, precision as f32, output)?;

    println!(
        "Wrote {} ({}x{}, camera {}, {} segments)",
        args.output,
        args.width * precision,
        args.height * precision,
        viewport.rigs().active().name,
        frame.segments.len()
    );
    Ok(())
}
