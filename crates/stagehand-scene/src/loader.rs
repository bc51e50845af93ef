//! Scene loading from TOML files

use crate::format::SceneFile;
use crate::graph::SceneGraph;
use stagehand_core::{Result, StagehandError};
use std::fs;
use std::path::Path;

/// Load a scene from a TOML file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<(SceneGraph, SceneFile)> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let loaded = load_scene_string(&content)?;
    log::info!(
        "loaded scene '{}' from {} ({} nodes)",
        loaded.1.scene.name,
        path.display(),
        loaded.0.len()
    );
    Ok(loaded)
}

/// Load a scene from a TOML string
pub fn load_scene_string(content: &str) -> Result<(SceneGraph, SceneFile)> {
    let scene_file: SceneFile = toml::from_str(content)?;
    let graph = build_graph(&scene_file)?;
    Ok((graph, scene_file))
}

/// Build a graph from an already parsed scene file
pub fn build_graph(scene_file: &SceneFile) -> Result<SceneGraph> {
    let mut graph = SceneGraph::new();

    // First pass: create all nodes so parents may be declared after children
    for def in &scene_file.nodes {
        let id = graph.spawn_with_transform(def.name.clone(), def.to_kind()?, def.transform())?;
        if !def.pickable {
            graph.set_pickable(id, false)?;
        }
    }

    // Second pass: relationships
    for def in &scene_file.nodes {
        if let Some(parent) = &def.parent {
            if graph.node_by_name(parent).is_none() {
                return Err(StagehandError::InvalidHierarchy(format!(
                    "node '{}' has unknown parent '{}'",
                    def.name, parent
                )));
            }
            graph.set_parent_by_name(&def.name, parent)?;
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use stagehand_core::Vec3;

    const SCENE: &str = r#"
[scene]
name = "Loader Test"

[[node]]
name = "lamp"
type = "mesh"
parent = "rig"

[node.bounds]
min = [-1.0, 0.0, -1.0]
max = [1.0, 2.0, 1.0]

[[node]]
name = "rig"
type = "group"
position = [-10.0, 2.0, 40.0]
scale = [10.0, 10.0, 10.0]
pickable = false
"#;

    #[test]
    fn test_load_scene_string() {
        let (graph, scene) = load_scene_string(SCENE).unwrap();
        assert_eq!(scene.scene.name, "Loader Test");
        assert_eq!(graph.len(), 2);

        let lamp = graph.node_by_name("lamp").unwrap();
        let rig = graph.node_by_name("rig").unwrap();
        assert_eq!(graph.parent(lamp), Some(rig));
        assert!(matches!(graph.kind(lamp), Some(NodeKind::Mesh { .. })));
        assert_eq!(graph.position(rig), Some(Vec3::new(-10.0, 2.0, 40.0)));
        assert!(!graph.is_pickable(lamp));
    }

    #[test]
    fn test_unknown_parent() {
        let text = r#"
[scene]
name = "Broken"

[[node]]
name = "orphan"
type = "group"
parent = "nobody"
"#;
        assert!(matches!(
            load_scene_string(text),
            Err(StagehandError::InvalidHierarchy(_))
        ));
    }

    #[test]
    fn test_parent_cycle() {
        let text = r#"
[scene]
name = "Loop"

[[node]]
name = "a"
type = "group"
parent = "b"

[[node]]
name = "b"
type = "group"
parent = "a"
"#;
        assert!(load_scene_string(text).is_err());
    }

    #[test]
    fn test_duplicate_names() {
        let text = r#"
[scene]
name = "Twins"

[[node]]
name = "a"
type = "group"

[[node]]
name = "a"
type = "group"
"#;
        assert!(matches!(
            load_scene_string(text),
            Err(StagehandError::DuplicateNodeName(_))
        ));
    }

    #[test]
    fn test_load_scene_file() {
        let path = std::env::temp_dir().join("stagehand_loader_test.scene.toml");
        fs::write(&path, SCENE).unwrap();
        let (graph, _) = load_scene(&path).unwrap();
        assert_eq!(graph.len(), 2);
        let _ = fs::remove_file(&path);
    }
}
