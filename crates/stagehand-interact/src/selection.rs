//! Which asset the transform gizmo is attached to

use stagehand_core::NodeId;
use stagehand_scene::{NodeKind, SceneGraph};

/// Gizmo attachment state.
///
/// Only the roots of the scene's assets are attachable; clicking any mesh
/// inside an asset attaches the gizmo to that asset's root.
#[derive(Debug, Clone, Default)]
pub struct GizmoSelection {
    attachable: Vec<NodeId>,
    attached: Option<NodeId>,
    pub position_gizmo: bool,
    pub rotation_gizmo: bool,
}

impl GizmoSelection {
    /// Attachable roots are parentless groups and meshes that answer picks
    pub fn from_scene(graph: &SceneGraph) -> Self {
        let attachable = graph
            .nodes()
            .iter()
            .copied()
            .filter(|id| graph.parent(*id).is_none() && graph.is_pickable(*id))
            .filter(|id| matches!(graph.kind(*id), Some(NodeKind::Group | NodeKind::Mesh { .. })))
            .collect();

        Self {
            attachable,
            ..Default::default()
        }
    }

    pub fn attachable(&self) -> &[NodeId] {
        &self.attachable
    }

    pub fn is_attachable(&self, id: NodeId) -> bool {
        self.attachable.contains(&id)
    }

    pub fn attached(&self) -> Option<NodeId> {
        self.attached
    }

    /// Attach to the asset containing `node`. Returns the new attachment.
    pub fn attach_for(&mut self, graph: &SceneGraph, node: NodeId) -> Option<NodeId> {
        let root = graph.topmost_ancestor(node);
        if self.is_attachable(root) {
            self.attached = Some(root);
        }
        self.attached
    }

    pub fn detach(&mut self) {
        self.attached = None;
    }
}
