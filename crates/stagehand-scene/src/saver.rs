//! Scene saving to TOML files

use crate::format::{NodeDef, SceneFile, SceneMetadata};
use crate::graph::SceneGraph;
use stagehand_core::Result;
use std::fs;
use std::path::Path;

/// Save a graph to a scene file
pub fn save_scene<P: AsRef<Path>>(path: P, graph: &SceneGraph, metadata: &SceneMetadata) -> Result<()> {
    let path = path.as_ref();
    let content = save_scene_string(graph, metadata)?;
    fs::write(path, content)?;
    log::info!("saved scene '{}' to {}", metadata.name, path.display());
    Ok(())
}

/// Save a graph to a TOML string
pub fn save_scene_string(graph: &SceneGraph, metadata: &SceneMetadata) -> Result<String> {
    let scene_file = graph_to_scene_file(graph, metadata);
    let content = toml::to_string_pretty(&scene_file)?;
    Ok(content)
}

/// Convert a graph to a SceneFile, keeping spawn order
pub fn graph_to_scene_file(graph: &SceneGraph, metadata: &SceneMetadata) -> SceneFile {
    let mut scene = SceneFile {
        scene: metadata.clone(),
        nodes: Vec::with_capacity(graph.len()),
    };

    for &id in graph.nodes() {
        let (Some(name), Some(kind), Some(transform)) =
            (graph.name(id), graph.kind(id), graph.transform(id))
        else {
            continue;
        };

        let mut def = NodeDef::from_kind(name, &kind, &transform);
        def.parent = graph.parent(id).and_then(|p| graph.name(p)).map(str::to_string);
        def.pickable = graph.own_pickable(id);
        scene.add_node(def);
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_scene_string;
    use crate::node::{Bounds, NodeKind};
    use stagehand_core::{Transform, Vec3};

    #[test]
    fn test_save_keeps_order_parents_and_moves() {
        let mut graph = SceneGraph::new();
        let root = graph
            .spawn_with_transform(
                "root",
                NodeKind::Group,
                Transform::from_position(Vec3::new(-14.0, 8.4, -10.0)),
            )
            .unwrap();
        let body = graph
            .spawn(
                "body",
                NodeKind::Mesh {
                    bounds: Bounds::centered(Vec3::ONE),
                    emissive: None,
                },
            )
            .unwrap();
        graph.set_parent(body, root).unwrap();
        graph.set_pickable(body, false).unwrap();
        graph.translate(root, Vec3::new(1.0, 0.0, 0.0)).unwrap();

        let metadata = SceneMetadata {
            name: "Saved".to_string(),
            version: "1.0".to_string(),
            description: Some("after a drag".to_string()),
        };
        let text = save_scene_string(&graph, &metadata).unwrap();
        assert!(text.find("\"root\"").unwrap() < text.find("\"body\"").unwrap());

        let (loaded, file) = load_scene_string(&text).unwrap();
        assert_eq!(file.scene.description.as_deref(), Some("after a drag"));
        let root = loaded.node_by_name("root").unwrap();
        let body = loaded.node_by_name("body").unwrap();
        assert_eq!(loaded.parent(body), Some(root));
        assert!(!loaded.own_pickable(body));
        assert!(loaded
            .position(root)
            .unwrap()
            .approx_eq(&Vec3::new(-13.0, 8.4, -10.0), 1e-5));
    }
}
