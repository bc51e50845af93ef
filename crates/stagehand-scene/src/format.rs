//! Scene file format definitions

use crate::node::{Bounds, CameraDef, NodeKind};
use serde::{Deserialize, Serialize};
use stagehand_core::{Color, Light, Result, StagehandError, Transform, Vec3};

/// Root structure of a scene TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub scene: SceneMetadata,
    /// Nodes in declaration order; `[[node]]` tables
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeDef>,
}

/// Scene metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMetadata {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Group,
    Mesh,
    Ground,
    Light,
    Camera,
}

/// One `[[node]]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub position: Vec3,
    /// Degrees
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotation: Vec3,
    #[serde(default = "unit_scale", skip_serializing_if = "is_unit")]
    pub scale: Vec3,
    #[serde(default = "default_pickable", skip_serializing_if = "is_true")]
    pub pickable: bool,

    /// Mesh bounds, local space
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive: Option<Color>,
    /// Ground width and depth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<Light>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraDef>,
}

fn is_zero(v: &Vec3) -> bool {
    *v == Vec3::ZERO
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

fn is_unit(v: &Vec3) -> bool {
    *v == Vec3::ONE
}

fn default_pickable() -> bool {
    true
}

fn is_true(p: &bool) -> bool {
    *p
}

impl NodeDef {
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            parent: None,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            pickable: true,
            bounds: None,
            emissive: None,
            size: None,
            light: None,
            camera: None,
        }
    }

    /// Build a definition from a live node
    pub fn from_kind(name: impl Into<String>, kind: &NodeKind, transform: &Transform) -> Self {
        let mut def = match kind {
            NodeKind::Group => Self::new(name, NodeType::Group),
            NodeKind::Mesh { bounds, emissive } => Self {
                bounds: Some(*bounds),
                emissive: *emissive,
                ..Self::new(name, NodeType::Mesh)
            },
            NodeKind::Ground { width, depth } => Self {
                size: Some([*width, *depth]),
                ..Self::new(name, NodeType::Ground)
            },
            NodeKind::Light(light) => Self {
                light: Some(light.clone()),
                ..Self::new(name, NodeType::Light)
            },
            NodeKind::Camera(camera) => Self {
                camera: Some(camera.clone()),
                ..Self::new(name, NodeType::Camera)
            },
        };
        def.position = transform.position;
        def.rotation = transform.rotation;
        def.scale = transform.scale;
        def
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Resolve the type-specific fields into a node payload
    pub fn to_kind(&self) -> Result<NodeKind> {
        let missing = |field: &str| {
            StagehandError::SceneError(format!(
                "{} node '{}' is missing '{}'",
                type_label(self.node_type),
                self.name,
                field
            ))
        };

        Ok(match self.node_type {
            NodeType::Group => NodeKind::Group,
            NodeType::Mesh => NodeKind::Mesh {
                bounds: self.bounds.ok_or_else(|| missing("bounds"))?,
                emissive: self.emissive,
            },
            NodeType::Ground => {
                let [width, depth] = self.size.ok_or_else(|| missing("size"))?;
                if width <= 0.0 || depth <= 0.0 {
                    return Err(StagehandError::SceneError(format!(
                        "ground '{}' must have a positive size",
                        self.name
                    )));
                }
                NodeKind::Ground { width, depth }
            }
            NodeType::Light => NodeKind::Light(self.light.clone().ok_or_else(|| missing("light"))?),
            NodeType::Camera => {
                NodeKind::Camera(self.camera.clone().ok_or_else(|| missing("camera"))?)
            }
        })
    }
}

fn type_label(t: NodeType) -> &'static str {
    match t {
        NodeType::Group => "group",
        NodeType::Mesh => "mesh",
        NodeType::Ground => "ground",
        NodeType::Light => "light",
        NodeType::Camera => "camera",
    }
}

impl SceneFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scene: SceneMetadata {
                name: name.into(),
                version: default_version(),
                description: None,
            },
            nodes: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: NodeDef) {
        self.nodes.push(node);
    }

    pub fn node(&self, name: &str) -> Option<&NodeDef> {
        self.nodes.iter().find(|n| n.name == name)
    }
}
