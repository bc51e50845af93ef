//! The built-in green screen studio

use crate::format::SceneFile;
use crate::graph::SceneGraph;
use crate::loader::load_scene_string;
use stagehand_core::Result;

/// TOML source of the studio scene
pub const STUDIO_SCENE: &str = include_str!("../scenes/studio.scene.toml");

/// Load the studio scene
pub fn studio_scene() -> Result<(SceneGraph, SceneFile)> {
    load_scene_string(STUDIO_SCENE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    #[test]
    fn test_studio_loads() {
        let (graph, file) = studio_scene().unwrap();
        assert_eq!(file.scene.name, "Green Screen Studio");
        assert!(graph.ground().is_some());
        assert_eq!(graph.lights().len(), 4);
        assert_eq!(graph.cameras().len(), 3);
    }

    #[test]
    fn test_studio_light_headers() {
        let (graph, _) = studio_scene().unwrap();
        let headers: Vec<String> = graph
            .lights()
            .iter()
            .map(|(id, light)| light.header(graph.name(*id).unwrap()))
            .collect();
        assert_eq!(
            headers,
            vec![
                "HemisphericLight  envLight",
                "DirectionalLight  sun",
                "PointLight  pointLight",
                "SpotLight  spotLight",
            ]
        );
    }

    #[test]
    fn test_stage_is_not_pickable() {
        let (graph, _) = studio_scene().unwrap();
        let wall = graph.node_by_name("stage_cyclorama").unwrap();
        assert!(!graph.is_pickable(wall));
        let bulb = graph.node_by_name("studio_light_bulb").unwrap();
        assert!(graph.is_pickable(bulb));
        assert_eq!(
            graph.topmost_ancestor(bulb),
            graph.node_by_name("studio_light").unwrap()
        );
    }

    #[test]
    fn test_woman_stands_on_ground() {
        let (graph, _) = studio_scene().unwrap();
        let body = graph.node_by_name("woman_body").unwrap();
        let Some(NodeKind::Mesh { bounds, .. }) = graph.kind(body) else {
            panic!("woman_body should be a mesh");
        };
        let feet = stagehand_core::mat4_transform_point(&graph.world_matrix(body), bounds.min);
        assert!(feet.y.abs() < 1e-3);
    }
}
