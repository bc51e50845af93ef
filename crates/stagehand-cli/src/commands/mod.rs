//! CLI command implementations

pub mod lights;
pub mod replay;
pub mod scene;
pub mod serve;
pub mod snapshot;

use anyhow::{Context, Result};
use stagehand_scene::{load_scene, studio_scene, SceneFile, SceneGraph};

/// Load a scene file, or the built-in studio when no path is given
pub fn load_or_studio(path: Option<&str>) -> Result<(SceneGraph, SceneFile)> {
    match path {
        Some(path) => load_scene(path).with_context(|| format!("Failed to load scene {}", path)),
        None => studio_scene().context("Failed to build the studio scene"),
    }
}
