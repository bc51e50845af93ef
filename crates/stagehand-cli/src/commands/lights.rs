//! Light inspection and editing commands

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use stagehand_core::{Color, Light, LightEdit, Vec3};
use stagehand_scene::{load_scene, save_scene, SceneGraph};

#[derive(Subcommand)]
pub enum LightsCommands {
    /// List the lights of a scene
    List {
        /// Path to scene file
        scene: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Change light properties and save the scene
    Set {
        /// Path to scene file
        scene: String,

        /// Light name
        light: String,

        #[arg(long, conflicts_with = "disabled")]
        enabled: bool,

        #[arg(long)]
        disabled: bool,

        /// Diffuse color (#rrggbb)
        #[arg(long, value_parser = parse_color)]
        diffuse: Option<Color>,

        /// Specular color (#rrggbb)
        #[arg(long, value_parser = parse_color)]
        specular: Option<Color>,

        /// Ground color of a hemispheric light (#rrggbb)
        #[arg(long, value_parser = parse_color)]
        ground_color: Option<Color>,

        #[arg(long)]
        intensity: Option<f32>,

        /// Direction (comma-separated x,y,z)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        direction: Option<Vec3>,

        /// Spot cone angle in degrees
        #[arg(long)]
        angle: Option<f32>,

        /// Range; 0 means unlimited
        #[arg(long)]
        range: Option<f32>,
    },
}

#[derive(Serialize)]
struct LightEntry<'a> {
    name: &'a str,
    header: String,
    #[serde(flatten)]
    light: &'a Light,
}

pub fn run(cmd: LightsCommands) -> Result<()> {
    match cmd {
        LightsCommands::List { scene, format } => list(&scene, &format),
        LightsCommands::Set {
            scene,
            light,
            enabled,
            disabled,
            diffuse,
            specular,
            ground_color,
            intensity,
            direction,
            angle,
            range,
        } => {
            let mut edits = Vec::new();
            if enabled {
                edits.push(LightEdit::Enabled(true));
            }
            if disabled {
                edits.push(LightEdit::Enabled(false));
            }
            edits.extend(diffuse.map(LightEdit::Diffuse));
            edits.extend(specular.map(LightEdit::Specular));
            edits.extend(ground_color.map(LightEdit::GroundColor));
            edits.extend(intensity.map(LightEdit::Intensity));
            edits.extend(direction.map(LightEdit::Direction));
            edits.extend(angle.map(LightEdit::Angle));
            edits.extend(range.map(|r| LightEdit::Range(Some(r))));
            set(&scene, &light, &edits)
        }
    }
}

fn list(path: &str, format: &str) -> Result<()> {
    let (graph, _) = load_scene(path).with_context(|| format!("Failed to load scene {}", path))?;
    let lights = graph.lights();

    match format {
        "json" => {
            let entries: Vec<LightEntry> = lights
                .iter()
                .map(|(id, light)| {
                    let name = graph.name(*id).unwrap_or_default();
                    LightEntry {
                        name,
                        header: light.header(name),
                        light,
                    }
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        "text" => {
            for (id, light) in &lights {
                let state = if light.enabled { "" } else { "  (off)" };
                println!("{}{}", light.header(graph.name(*id).unwrap_or_default()), state);
            }
        }
        other => anyhow::bail!("Unknown format '{}'; expected text or json", other),
    }

    Ok(())
}

fn set(path: &str, name: &str, edits: &[LightEdit]) -> Result<()> {
    if edits.is_empty() {
        anyhow::bail!("Nothing to change; pass at least one property flag");
    }

    let (mut graph, scene) = load_scene(path).with_context(|| format!("Failed to load scene {}", path))?;
    apply_edits(&mut graph, name, edits)?;
    save_scene(path, &graph, &scene.scene)?;

    println!("Updated {} ({} change(s))", name, edits.len());
    Ok(())
}

/// Apply every edit or none: edits go to a scratch copy of the light first
fn apply_edits(graph: &mut SceneGraph, name: &str, edits: &[LightEdit]) -> Result<()> {
    let id = graph.require(name)?;
    let mut scratch = graph
        .light(id)
        .with_context(|| format!("'{}' is not a light", name))?;
    for edit in edits {
        scratch
            .apply(*edit)
            .with_context(|| format!("Cannot change {} of '{}'", edit.property_name(), name))?;
    }
    for edit in edits {
        graph.edit_light(id, *edit)?;
    }
    Ok(())
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::from_hex_str(s).map_err(|e| e.to_string())
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    let z: f32 = parts[2].trim().parse().map_err(|e| format!("invalid z: {}", e))?;
    Ok(Vec3::new(x, y, z))
}
