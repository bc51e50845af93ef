//! Stagehand CLI - studio scenes from the command line

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{lights, replay, scene, serve, snapshot};

#[derive(Parser)]
#[command(name = "stagehand")]
#[command(about = "Green screen studio viewer with mesh drag-and-drop", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scene operations
    #[command(subcommand)]
    Scene(scene::SceneCommands),

    /// Inspect and edit scene lights
    #[command(subcommand)]
    Lights(lights::LightsCommands),

    /// Render the scene wireframe to a PNG image (headless)
    Snapshot {
        /// Path to scene file (defaults to the built-in studio)
        scene: Option<String>,

        /// Output image path
        #[arg(short, long, default_value = "snapshot.png")]
        output: String,

        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Viewport height in pixels
        #[arg(long, default_value = "720")]
        height: u32,

        /// Resolution multiplier
        #[arg(long)]
        precision: Option<u32>,

        /// Camera to look through
        #[arg(long)]
        camera: Option<String>,
    },

    /// Replay a pointer script against a scene
    Replay {
        /// Path to scene file
        scene: String,

        /// Path to pointer script
        script: String,

        /// Write the resulting scene back to the scene file
        #[arg(long)]
        save: bool,
    },

    /// Open the interactive viewer
    Serve {
        /// Path to scene file (defaults to the built-in studio)
        scene: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scene(cmd) => scene::run(cmd),
        Commands::Lights(cmd) => lights::run(cmd),
        Commands::Snapshot {
            scene,
            output,
            width,
            height,
            precision,
            camera,
        } => snapshot::run(snapshot::SnapshotArgs {
            scene,
            output,
            width,
            height,
            precision,
            camera,
        }),
        Commands::Replay { scene, script, save } => replay::run(&scene, &script, save),
        Commands::Serve { scene } => serve::run(scene.as_deref()),
    }
}
