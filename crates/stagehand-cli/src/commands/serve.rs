//! Interactive viewer

use super::load_or_studio;
use anyhow::{Context, Result};
use stagehand_interact::ViewerConfig;

pub fn run(scene: Option<&str>) -> Result<()> {
    let config = ViewerConfig::load().context("Failed to load viewer config")?;
    let (graph, file) = load_or_studio(scene)?;

    println!("Loaded scene: {}", file.scene.name);
    println!("Nodes: {}", graph.len());
    println!("Drag meshes across the ground; C cycles cameras, Tab toggles panels.");

    stagehand_viewer::run(graph, file.scene, config)
}
