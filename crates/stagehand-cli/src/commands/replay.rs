//! Replay a recorded pointer script headlessly

use anyhow::{Context, Result};
use stagehand_interact::{DragOutcome, PointerScript, ViewerConfig, Viewport};
use stagehand_scene::{load_scene, save_scene};

pub fn run(scene_path: &str, script_path: &str, save: bool) -> Result<()> {
    let config = ViewerConfig::load().context("Failed to load viewer config")?;
    let (graph, scene) =
        load_scene(scene_path).with_context(|| format!("Failed to load scene {}", scene_path))?;
    let script = PointerScript::load(script_path)
        .with_context(|| format!("Failed to load pointer script {}", script_path))?;

    let size = [config.window.width as f32, config.window.height as f32];
    let mut viewport = Viewport::with_orbit_controls(graph, scene.scene, config, size)?;

    let outcomes = viewport.replay(&script);
    viewport.dispose();
    log::info!(
        "replayed {} on {}: {} event(s), {} drag outcome(s)",
        script_path,
        scene_path,
        script.events.len(),
        outcomes.iter().filter(|o| **o != DragOutcome::Ignored).count()
    );

    println!("Replayed {} pointer event(s)", outcomes.len());
    for outcome in &outcomes {
        if let Some(line) = describe(&viewport, outcome) {
            println!("  {}", line);
        }
    }

    let graph = viewport.graph();
    println!();
    println!("Final positions:");
    for &root in viewport.selection().attachable() {
        if let Some(p) = graph.position(root) {
            println!(
                "  {} [{:.3}, {:.3}, {:.3}]",
                graph.name(root).unwrap_or_default(),
                p.x,
                p.y,
                p.z
            );
        }
    }

    if save {
        save_scene(scene_path, graph, viewport.metadata())?;
        println!("Saved {}", scene_path);
    }
    Ok(())
}

fn describe(viewport: &Viewport, outcome: &DragOutcome) -> Option<String> {
    let name = |id| viewport.graph().name(id).unwrap_or_default().to_string();
    match *outcome {
        DragOutcome::Started { target, anchor } => Some(format!(
            "drag {} from [{:.3}, {:.3}, {:.3}]",
            name(target),
            anchor.x,
            anchor.y,
            anchor.z
        )),
        DragOutcome::Moved { target, delta } => Some(format!(
            "move {} by [{:.3}, {:.3}, {:.3}]",
            name(target),
            delta.x,
            delta.y,
            delta.z
        )),
        DragOutcome::Ended { target } => Some(format!("drop {}", name(target))),
        DragOutcome::Deselected => Some("deselect".to_string()),
        DragOutcome::Ignored => None,
    }
}
