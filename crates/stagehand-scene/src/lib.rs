//! Stagehand Scene - scene graph and TOML scene files
//!
//! Scenes are TOML documents with a `[scene]` header and ordered `[[node]]`
//! tables. Loading builds a [`SceneGraph`]; saving writes one back.

mod format;
mod graph;
mod loader;
mod node;
mod saver;
mod studio;

pub use format::{NodeDef, NodeType, SceneFile, SceneMetadata};
pub use graph::SceneGraph;
pub use loader::{build_graph, load_scene, load_scene_string};
pub use node::{Bounds, CameraDef, NodeKind};
pub use saver::{graph_to_scene_file, save_scene, save_scene_string};
pub use studio::{studio_scene, STUDIO_SCENE};
