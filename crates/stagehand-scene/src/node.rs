//! What a scene node is

use serde::{Deserialize, Serialize};
use stagehand_core::{Color, Light, Vec3};

/// Local-space bounding box of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered on the origin
    pub fn centered(half: Vec3) -> Self {
        Self::new(-half, half)
    }

    /// The eight corners, bottom face first
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(a.x, b.y, b.z),
        ]
    }
}

/// How a camera node looks at the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CameraDef {
    /// Orbits `target`; angles in degrees
    Orbit {
        #[serde(default)]
        target: Vec3,
        yaw: f32,
        pitch: f32,
        distance: f32,
    },
    /// Sits at the node's world position. Looks at `look_at` when given,
    /// otherwise along the node's local -Z axis.
    Free {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        look_at: Option<Vec3>,
    },
}

/// The payload of a scene node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Transform-only node; the root of imported assets
    Group,
    Mesh {
        bounds: Bounds,
        emissive: Option<Color>,
    },
    /// The finite reference plane at the node's height
    Ground {
        width: f32,
        depth: f32,
    },
    Light(Light),
    Camera(CameraDef),
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Mesh { .. } => "mesh",
            NodeKind::Ground { .. } => "ground",
            NodeKind::Light(_) => "light",
            NodeKind::Camera(_) => "camera",
        }
    }
}
