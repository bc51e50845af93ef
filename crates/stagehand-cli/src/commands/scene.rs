//! Scene management commands

use anyhow::{Context, Result};
use clap::Subcommand;
use stagehand_scene::{load_scene, save_scene, studio_scene};
use std::fs;
use std::path::Path;

#[derive(Subcommand)]
pub enum SceneCommands {
    /// Create a new scene file from the studio template
    Create {
        /// Path to scene file
        path: String,

        /// Scene name (defaults to filename)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show scene information
    Info {
        /// Path to scene file
        path: String,
    },
}

pub fn run(cmd: SceneCommands) -> Result<()> {
    match cmd {
        SceneCommands::Create { path, name } => create(&path, name.as_deref()),
        SceneCommands::Info { path } => info(&path),
    }
}

fn create(path: &str, name: Option<&str>) -> Result<()> {
    let path = if path.ends_with(".toml") {
        path.to_string()
    } else if path.ends_with(".scene") {
        format!("{}.toml", path)
    } else {
        format!("{}.scene.toml", path)
    };

    if Path::new(&path).exists() {
        anyhow::bail!("Scene file already exists: {}", path);
    }

    let (graph, mut scene) = studio_scene().context("Failed to build the studio template")?;
    scene.scene.name = name.map(String::from).unwrap_or_else(|| {
        Path::new(&path)
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.trim_end_matches(".scene"))
            .unwrap_or("Untitled")
            .to_string()
    });

    if let Some(parent) = Path::new(&path).parent() {
        fs::create_dir_all(parent)?;
    }
    save_scene(&path, &graph, &scene.scene)?;

    println!("Created scene: {}", path);

    Ok(())
}

fn info(path: &str) -> Result<()> {
    let (graph, scene) = load_scene(path).with_context(|| format!("Failed to load scene {}", path))?;

    println!("Scene: {}", scene.scene.name);
    println!("Version: {}", scene.scene.version);
    if let Some(desc) = &scene.scene.description {
        println!("Description: {}", desc);
    }
    println!("Nodes: {}", graph.len());
    println!("Lights: {}", graph.lights().len());
    println!("Cameras: {}", graph.cameras().len());

    if !graph.is_empty() {
        println!();
        println!("Node list:");
        for &id in graph.nodes() {
            let name = graph.name(id).unwrap_or_default();
            let kind = graph.kind(id).map(|k| k.type_name()).unwrap_or("?");
            let parent = graph
                .parent(id)
                .and_then(|p| graph.name(p))
                .map(|p| format!(" -> {}", p))
                .unwrap_or_default();
            let pinned = if graph.own_pickable(id) { "" } else { " (not pickable)" };
            println!("  {} [{}]{}{}", name, kind, parent, pinned);
        }
    }

    Ok(())
}
