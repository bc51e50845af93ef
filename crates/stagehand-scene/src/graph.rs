//! SceneGraph - node arena with stable handles and a parent relation

use crate::node::{Bounds, CameraDef, NodeKind};
use bimap::BiMap;
use stagehand_core::{
    mat4_mul, mat4_transform_point, Color, Light, LightEdit, NodeId, Result, StagehandError,
    Transform, Vec3, IDENTITY,
};
use std::collections::HashMap;

/// Whether a node (and everything under it) answers pointer picks
struct Pickable(bool);

/// The scene graph for the studio
///
/// Wraps hecs::World with:
/// - Stable NodeId handles
/// - Unique node names
/// - A child -> parent relation that never contains a cycle
/// - Spawn order, which scene files and the lights panel follow
pub struct SceneGraph {
    world: hecs::World,
    id_map: BiMap<NodeId, hecs::Entity>,
    names: BiMap<String, NodeId>,
    parents: HashMap<NodeId, NodeId>,
    order: Vec<NodeId>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            world: hecs::World::new(),
            id_map: BiMap::new(),
            names: BiMap::new(),
            parents: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Spawn a node with an identity transform
    pub fn spawn(&mut self, name: impl Into<String>, kind: NodeKind) -> Result<NodeId> {
        self.spawn_with_transform(name, kind, Transform::IDENTITY)
    }

    pub fn spawn_with_transform(
        &mut self,
        name: impl Into<String>,
        kind: NodeKind,
        transform: Transform,
    ) -> Result<NodeId> {
        let name = name.into();
        if self.names.contains_left(&name) {
            return Err(StagehandError::DuplicateNodeName(name));
        }

        let id = NodeId::new();
        let entity = self.world.spawn((kind, transform, Pickable(true)));

        self.id_map.insert(id, entity);
        self.names.insert(name, id);
        self.order.push(id);
        Ok(id)
    }

    /// Despawn a node. Its children become roots.
    pub fn despawn(&mut self, id: NodeId) -> Result<()> {
        let entity = self.entity(id)?;
        self.world
            .despawn(entity)
            .map_err(|_| StagehandError::NodeNotFound(id.to_string()))?;

        self.id_map.remove_by_left(&id);
        self.names.remove_by_right(&id);
        self.order.retain(|n| *n != id);
        self.parents.remove(&id);
        self.parents.retain(|_, parent| *parent != id);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.world.clear();
        self.id_map.clear();
        self.names.clear();
        self.parents.clear();
        self.order.clear();
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_map.contains_left(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All nodes in spawn order
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.names.get_by_left(name).copied()
    }

    /// Look up a node by name, failing with `NodeNotFound`
    pub fn require(&self, name: &str) -> Result<NodeId> {
        self.node_by_name(name)
            .ok_or_else(|| StagehandError::NodeNotFound(name.to_string()))
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.names.get_by_right(&id).map(String::as_str)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        let entity = self.entity(id).ok()?;
        let kind = self.world.get::<&NodeKind>(entity).ok()?;
        Some((*kind).clone())
    }

    // --- hierarchy ---

    /// Make `parent` the parent of `child`.
    ///
    /// Rejects unknown nodes, self-parenting and any link that would close a
    /// cycle, so walking `parent` from any node always reaches a root.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        self.entity(child)?;
        self.entity(parent)?;

        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(StagehandError::InvalidHierarchy(format!(
                    "parenting {} to {} would create a cycle",
                    self.display_name(child),
                    self.display_name(parent)
                )));
            }
            cursor = self.parent(node);
        }

        self.parents.insert(child, parent);
        Ok(())
    }

    pub fn set_parent_by_name(&mut self, child: &str, parent: &str) -> Result<()> {
        let child = self.require(child)?;
        let parent = self.require(parent)?;
        self.set_parent(child, parent)
    }

    pub fn clear_parent(&mut self, child: NodeId) {
        self.parents.remove(&child);
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    /// Direct children in spawn order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.order
            .iter()
            .copied()
            .filter(|n| self.parent(*n) == Some(id))
            .collect()
    }

    /// Follow parent links up to the root
    pub fn topmost_ancestor(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(id);
        while let Some(node) = cursor {
            if node == ancestor {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    // --- transforms ---

    pub fn transform(&self, id: NodeId) -> Option<Transform> {
        let entity = self.entity(id).ok()?;
        let transform = self.world.get::<&Transform>(entity).ok()?;
        Some(*transform)
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> Result<()> {
        let entity = self.entity(id)?;
        let mut current = self
            .world
            .get::<&mut Transform>(entity)
            .map_err(|_| StagehandError::NodeNotFound(id.to_string()))?;
        *current = transform;
        Ok(())
    }

    /// Local position (relative to the parent)
    pub fn position(&self, id: NodeId) -> Option<Vec3> {
        self.transform(id).map(|t| t.position)
    }

    /// Add `delta` to the node's local position
    pub fn translate(&mut self, id: NodeId, delta: Vec3) -> Result<()> {
        let entity = self.entity(id)?;
        let mut transform = self
            .world
            .get::<&mut Transform>(entity)
            .map_err(|_| StagehandError::NodeNotFound(id.to_string()))?;
        transform.position += delta;
        Ok(())
    }

    /// Set the node's local rotation in degrees
    pub fn set_rotation(&mut self, id: NodeId, rotation: Vec3) -> Result<()> {
        let entity = self.entity(id)?;
        let mut transform = self
            .world
            .get::<&mut Transform>(entity)
            .map_err(|_| StagehandError::NodeNotFound(id.to_string()))?;
        transform.rotation = rotation;
        Ok(())
    }

    /// World matrix, composing parent transforms up to the root
    pub fn world_matrix(&self, id: NodeId) -> [[f32; 4]; 4] {
        let local = self
            .transform(id)
            .map(|t| t.to_matrix())
            .unwrap_or(IDENTITY);
        match self.parent(id) {
            Some(parent) => mat4_mul(&self.world_matrix(parent), &local),
            None => local,
        }
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.contains(id)
            .then(|| mat4_transform_point(&self.world_matrix(id), Vec3::ZERO))
    }

    // --- picking ---

    /// A node answers picks only when it and all of its ancestors are pickable
    pub fn is_pickable(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            let own = self
                .entity(node)
                .ok()
                .and_then(|e| self.world.get::<&Pickable>(e).ok().map(|p| p.0))
                .unwrap_or(false);
            if !own {
                return false;
            }
            cursor = self.parent(node);
        }
        true
    }

    pub fn set_pickable(&mut self, id: NodeId, pickable: bool) -> Result<()> {
        let entity = self.entity(id)?;
        let mut flag = self
            .world
            .get::<&mut Pickable>(entity)
            .map_err(|_| StagehandError::NodeNotFound(id.to_string()))?;
        flag.0 = pickable;
        Ok(())
    }

    /// The node's own flag, ignoring ancestors
    pub fn own_pickable(&self, id: NodeId) -> bool {
        self.entity(id)
            .ok()
            .and_then(|e| self.world.get::<&Pickable>(e).ok().map(|p| p.0))
            .unwrap_or(false)
    }

    /// The first ground node
    pub fn ground(&self) -> Option<NodeId> {
        self.order
            .iter()
            .copied()
            .find(|id| matches!(self.kind(*id), Some(NodeKind::Ground { .. })))
    }

    pub fn bounds(&self, id: NodeId) -> Option<Bounds> {
        match self.kind(id)? {
            NodeKind::Mesh { bounds, .. } => Some(bounds),
            _ => None,
        }
    }

    pub fn emissive(&self, id: NodeId) -> Option<Color> {
        match self.kind(id)? {
            NodeKind::Mesh { emissive, .. } => emissive,
            _ => None,
        }
    }

    // --- lights ---

    pub fn lights(&self) -> Vec<(NodeId, Light)> {
        self.order
            .iter()
            .filter_map(|id| match self.kind(*id) {
                Some(NodeKind::Light(light)) => Some((*id, light)),
                _ => None,
            })
            .collect()
    }

    pub fn light(&self, id: NodeId) -> Option<Light> {
        match self.kind(id)? {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Apply an edit to a light. A diffuse change is mirrored onto the
    /// emissive color of the light's linked mesh.
    pub fn edit_light(&mut self, id: NodeId, edit: LightEdit) -> Result<()> {
        let entity = self.entity(id)?;
        let linked = {
            let mut kind = self
                .world
                .get::<&mut NodeKind>(entity)
                .map_err(|_| StagehandError::NodeNotFound(id.to_string()))?;
            let NodeKind::Light(light) = &mut *kind else {
                return Err(StagehandError::NotALight(self.display_name(id)));
            };
            light.apply(edit)?;
            light.linked_mesh.clone()
        };
        log::debug!("{}: set {}", self.display_name(id), edit.property_name());

        if let (LightEdit::Diffuse(color), Some(mesh_name)) = (edit, linked) {
            match self.node_by_name(&mesh_name) {
                Some(mesh) => self.set_emissive(mesh, color)?,
                None => log::warn!("linked mesh '{}' not found", mesh_name),
            }
        }
        Ok(())
    }

    pub fn set_emissive(&mut self, id: NodeId, color: Color) -> Result<()> {
        let entity = self.entity(id)?;
        let mut kind = self
            .world
            .get::<&mut NodeKind>(entity)
            .map_err(|_| StagehandError::NodeNotFound(id.to_string()))?;
        match &mut *kind {
            NodeKind::Mesh { emissive, .. } => {
                *emissive = Some(color);
                Ok(())
            }
            other => Err(StagehandError::SceneError(format!(
                "cannot set emissive color on a {} node",
                other.type_name()
            ))),
        }
    }

    // --- cameras ---

    pub fn cameras(&self) -> Vec<(NodeId, CameraDef)> {
        self.order
            .iter()
            .filter_map(|id| match self.kind(*id) {
                Some(NodeKind::Camera(def)) => Some((*id, def)),
                _ => None,
            })
            .collect()
    }

    fn entity(&self, id: NodeId) -> Result<hecs::Entity> {
        self.id_map
            .get_by_left(&id)
            .copied()
            .ok_or_else(|| StagehandError::NodeNotFound(id.to_string()))
    }

    fn display_name(&self, id: NodeId) -> String {
        self.name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_core::LightKind;

    fn mesh() -> NodeKind {
        NodeKind::Mesh {
            bounds: Bounds::centered(Vec3::ONE),
            emissive: None,
        }
    }

    #[test]
    fn test_spawn_and_lookup() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn("a", NodeKind::Group).unwrap();
        assert_eq!(graph.node_by_name("a"), Some(a));
        assert_eq!(graph.name(a), Some("a"));
        assert_eq!(graph.len(), 1);
        assert!(matches!(
            graph.spawn("a", NodeKind::Group),
            Err(StagehandError::DuplicateNodeName(_))
        ));
    }

    #[test]
    fn test_topmost_ancestor() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn("a", NodeKind::Group).unwrap();
        let b = graph.spawn("b", NodeKind::Group).unwrap();
        let c = graph.spawn("c", mesh()).unwrap();
        graph.set_parent(b, a).unwrap();
        graph.set_parent(c, b).unwrap();

        assert_eq!(graph.topmost_ancestor(c), a);
        assert_eq!(graph.topmost_ancestor(a), a);
        assert!(graph.is_descendant_of(c, a));
        assert!(!graph.is_descendant_of(a, c));
        assert_eq!(graph.children(a), vec![b]);
    }

    #[test]
    fn test_cycles_rejected() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn("a", NodeKind::Group).unwrap();
        let b = graph.spawn("b", NodeKind::Group).unwrap();
        graph.set_parent(b, a).unwrap();

        assert!(matches!(
            graph.set_parent(a, b),
            Err(StagehandError::InvalidHierarchy(_))
        ));
        assert!(graph.set_parent(a, a).is_err());
        assert_eq!(graph.parent(a), None);
    }

    #[test]
    fn test_translate_is_additive() {
        let mut graph = SceneGraph::new();
        let a = graph
            .spawn_with_transform("a", mesh(), Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();
        graph.translate(a, Vec3::new(0.5, 2.0, 0.0)).unwrap();
        assert_eq!(graph.position(a), Some(Vec3::new(1.5, 2.0, 0.0)));
        assert!(graph.translate(NodeId::from_raw(u64::MAX), Vec3::ONE).is_err());
    }

    #[test]
    fn test_world_position_composes_parents() {
        let mut graph = SceneGraph::new();
        let root = graph
            .spawn_with_transform(
                "root",
                NodeKind::Group,
                Transform::from_position(Vec3::new(10.0, 0.0, 0.0)).with_scale(Vec3::new(2.0, 2.0, 2.0)),
            )
            .unwrap();
        let child = graph
            .spawn_with_transform("child", mesh(), Transform::from_position(Vec3::new(1.0, 1.0, 0.0)))
            .unwrap();
        graph.set_parent(child, root).unwrap();

        let p = graph.world_position(child).unwrap();
        assert!(p.approx_eq(&Vec3::new(12.0, 2.0, 0.0), 1e-5));
    }

    #[test]
    fn test_pickable_inherits() {
        let mut graph = SceneGraph::new();
        let stage = graph.spawn("stage", NodeKind::Group).unwrap();
        let wall = graph.spawn("wall", mesh()).unwrap();
        graph.set_parent(wall, stage).unwrap();

        assert!(graph.is_pickable(wall));
        graph.set_pickable(stage, false).unwrap();
        assert!(!graph.is_pickable(wall));
        assert!(graph.own_pickable(wall));
    }

    #[test]
    fn test_despawn_orphans_children() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn("a", NodeKind::Group).unwrap();
        let b = graph.spawn("b", NodeKind::Group).unwrap();
        graph.set_parent(b, a).unwrap();
        graph.despawn(a).unwrap();

        assert!(!graph.contains(a));
        assert_eq!(graph.parent(b), None);
        assert_eq!(graph.node_by_name("a"), None);
        assert_eq!(graph.nodes(), &[b]);
    }

    #[test]
    fn test_diffuse_edit_syncs_linked_mesh() {
        let mut graph = SceneGraph::new();
        let lamp = graph.spawn("lamp", mesh()).unwrap();
        let light = graph
            .spawn(
                "spot",
                NodeKind::Light(
                    Light::new(LightKind::Point { range: None }).with_linked_mesh("lamp"),
                ),
            )
            .unwrap();

        graph.edit_light(light, LightEdit::Diffuse(Color::RED)).unwrap();
        assert_eq!(graph.light(light).unwrap().diffuse, Color::RED);
        assert_eq!(graph.emissive(lamp), Some(Color::RED));

        assert!(matches!(
            graph.edit_light(lamp, LightEdit::Enabled(false)),
            Err(StagehandError::NotALight(_))
        ));
    }

    #[test]
    fn test_ground_lookup() {
        let mut graph = SceneGraph::new();
        graph.spawn("box", mesh()).unwrap();
        let ground = graph
            .spawn("ground", NodeKind::Ground { width: 100.0, depth: 100.0 })
            .unwrap();
        assert_eq!(graph.ground(), Some(ground));
    }
}
