//! Pointer picking against the scene
//!
//! Unprojects screen coordinates through the active camera and tests the
//! ray against mesh bounding boxes and the finite ground rectangle.

use crate::camera::Camera;
use crate::projection::ray_plane_intersect;
use stagehand_core::{mat4_transform_point, NodeId, Vec3};
use stagehand_scene::{Bounds, NodeKind, SceneGraph};

/// A successful pick: where the ray met the scene, and what it met
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub point: Vec3,
    pub node: NodeId,
    /// Distance along the pick ray
    pub distance: f32,
}

/// Answers "what is under this screen point?"
///
/// `predicate` restricts which nodes may be hit; the nearest accepted hit wins.
pub trait PickService {
    fn pick(&self, x: f32, y: f32, predicate: &dyn Fn(NodeId) -> bool) -> Option<PickHit>;
}

/// A ray in 3D space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray from screen pixel coordinates using the camera's inverse
    /// view-projection matrix
    pub fn from_screen(x: f32, y: f32, viewport: [f32; 2], camera: &Camera) -> Option<Self> {
        if viewport[0] <= 0.0 || viewport[1] <= 0.0 {
            return None;
        }
        let inv_vp = camera.inverse_view_projection_matrix()?;

        let ndc_x = 2.0 * x / viewport[0] - 1.0;
        let ndc_y = 1.0 - 2.0 * y / viewport[1];

        let near = mat4_transform_point(&inv_vp, Vec3::new(ndc_x, ndc_y, -1.0));
        let far = mat4_transform_point(&inv_vp, Vec3::new(ndc_x, ndc_y, 1.0));

        let direction = (far - near).normalized();
        if direction == Vec3::ZERO {
            return None;
        }
        Some(Self {
            origin: near,
            direction,
        })
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// World-space box around local `bounds` transformed by a column-major matrix
    pub fn transformed(bounds: &Bounds, mat: &[[f32; 4]; 4]) -> Self {
        let local_min = bounds.min.to_array();
        let local_max = bounds.max.to_array();
        let mut new_min = [mat[3][0], mat[3][1], mat[3][2]];
        let mut new_max = new_min;

        for i in 0..3 {
            for j in 0..3 {
                let a = mat[i][j] * local_min[i];
                let b = mat[i][j] * local_max[i];
                new_min[j] += a.min(b);
                new_max[j] += a.max(b);
            }
        }

        Self {
            min: Vec3::from_array(new_min),
            max: Vec3::from_array(new_max),
        }
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance to the nearest hit in front of the origin.
pub fn ray_intersect(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let origin = ray.origin.to_array();
    let direction = ray.direction.to_array();
    let min = aabb.min.to_array();
    let max = aabb.max.to_array();

    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for i in 0..3 {
        if direction[i].abs() < 1e-8 {
            if origin[i] < min[i] || origin[i] > max[i] {
                return None;
            }
        } else {
            let inv_d = 1.0 / direction[i];
            let mut t1 = (min[i] - origin[i]) * inv_d;
            let mut t2 = (max[i] - origin[i]) * inv_d;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            tmin = tmin.max(t1);
            tmax = tmax.min(t2);
            if tmin > tmax {
                return None;
            }
        }
    }

    if tmax < 0.0 {
        None
    } else {
        Some(tmin.max(0.0))
    }
}

/// What a pick target looks like to the ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickShape {
    Box(Aabb),
    /// Horizontal rectangle at `center.y`
    Ground { center: Vec3, half_width: f32, half_depth: f32 },
}

/// A node with its world-space pick shape
#[derive(Debug, Clone, Copy)]
pub struct PickTarget {
    pub node: NodeId,
    pub shape: PickShape,
}

impl PickTarget {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        match self.shape {
            PickShape::Box(aabb) => ray_intersect(ray, &aabb),
            PickShape::Ground {
                center,
                half_width,
                half_depth,
            } => {
                let t = ray_plane_intersect(ray.origin, ray.direction, Vec3::UP, center.y)?;
                let p = ray.at(t);
                let inside = (p.x - center.x).abs() <= half_width && (p.z - center.z).abs() <= half_depth;
                inside.then_some(t)
            }
        }
    }
}

/// Build pick targets for every mesh and ground node, in scene order
pub fn build_pick_targets(graph: &SceneGraph) -> Vec<PickTarget> {
    let mut targets = Vec::new();

    for &node in graph.nodes() {
        let shape = match graph.kind(node) {
            Some(NodeKind::Mesh { bounds, .. }) => {
                PickShape::Box(Aabb::transformed(&bounds, &graph.world_matrix(node)))
            }
            Some(NodeKind::Ground { width, depth }) => match graph.world_position(node) {
                Some(center) => PickShape::Ground {
                    center,
                    half_width: width / 2.0,
                    half_depth: depth / 2.0,
                },
                None => continue,
            },
            _ => continue,
        };
        targets.push(PickTarget { node, shape });
    }

    targets
}

/// Picks against a snapshot of the scene taken through a camera.
///
/// The snapshot does not borrow the graph, so the scene can be mutated
/// while a picker for the current event is alive.
pub struct ScenePicker {
    targets: Vec<PickTarget>,
    camera: Camera,
    viewport: [f32; 2],
}

impl ScenePicker {
    pub fn new(graph: &SceneGraph, camera: &Camera, viewport: [f32; 2]) -> Self {
        Self {
            targets: build_pick_targets(graph),
            camera: camera.clone(),
            viewport,
        }
    }

    pub fn targets(&self) -> &[PickTarget] {
        &self.targets
    }

    pub fn ray(&self, x: f32, y: f32) -> Option<Ray> {
        Ray::from_screen(x, y, self.viewport, &self.camera)
    }
}

impl PickService for ScenePicker {
    fn pick(&self, x: f32, y: f32, predicate: &dyn Fn(NodeId) -> bool) -> Option<PickHit> {
        let ray = self.ray(x, y)?;

        let mut best: Option<PickHit> = None;
        for target in &self.targets {
            if !predicate(target.node) {
                continue;
            }
            if let Some(distance) = target.intersect(&ray) {
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(PickHit {
                        point: ray.at(distance),
                        node: target.node,
                        distance,
                    });
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraSettings;
    use stagehand_core::Transform;

    /// Looking straight down from y = 50 onto a 100x100 ground
    fn top_down() -> (SceneGraph, Camera, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let ground = graph
            .spawn("ground", NodeKind::Ground { width: 100.0, depth: 100.0 })
            .unwrap();
        let crate_box = graph
            .spawn_with_transform(
                "crate",
                NodeKind::Mesh {
                    bounds: Bounds::centered(Vec3::ONE),
                    emissive: None,
                },
                Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
            )
            .unwrap();
        let mut camera = Camera::free(Vec3::new(0.0, 50.0, 0.0), Vec3::ZERO, &CameraSettings::default());
        camera.aspect = 1.0;
        (graph, camera, ground, crate_box)
    }

    #[test]
    fn test_ray_from_center_points_at_target() {
        let (_, camera, _, _) = top_down();
        let ray = Ray::from_screen(50.0, 50.0, [100.0, 100.0], &camera).unwrap();
        assert!(ray.direction.approx_eq(&Vec3::DOWN, 1e-4));
    }

    #[test]
    fn test_nearest_hit_wins() {
        let (graph, camera, _, crate_box) = top_down();
        let picker = ScenePicker::new(&graph, &camera, [100.0, 100.0]);
        let hit = picker.pick(50.0, 50.0, &|_| true).unwrap();
        assert_eq!(hit.node, crate_box);
        assert!((hit.point.y - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_predicate_restricts_to_ground() {
        let (graph, camera, ground, _) = top_down();
        let picker = ScenePicker::new(&graph, &camera, [100.0, 100.0]);
        let hit = picker.pick(50.0, 50.0, &|id| id == ground).unwrap();
        assert_eq!(hit.node, ground);
        assert!(hit.point.approx_eq(&Vec3::ZERO, 1e-3));
    }

    #[test]
    fn test_ground_is_finite() {
        let (graph, _, ground, _) = top_down();
        // Meets the ground plane at z = 100, outside the 100x100 rectangle
        let mut camera = Camera::free(
            Vec3::new(0.0, 1.0, 200.0),
            Vec3::new(0.0, 0.0, 100.0),
            &CameraSettings::default(),
        );
        camera.aspect = 1.0;
        let picker = ScenePicker::new(&graph, &camera, [100.0, 100.0]);
        assert!(picker.pick(50.0, 50.0, &|id| id == ground).is_none());
    }

    #[test]
    fn test_slab_misses_behind() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::new(0.0, 0.0, 1.0),
        };
        let aabb = Aabb::from_min_max(-Vec3::ONE, Vec3::ONE);
        assert!(ray_intersect(&ray, &aabb).is_none());
    }

    #[test]
    fn test_transformed_bounds() {
        let t = Transform::from_position(Vec3::new(10.0, 0.0, 0.0)).with_scale(Vec3::new(2.0, 2.0, 2.0));
        let aabb = Aabb::transformed(&Bounds::centered(Vec3::ONE), &t.to_matrix());
        assert!(aabb.min.approx_eq(&Vec3::new(8.0, -2.0, -2.0), 1e-5));
        assert!(aabb.max.approx_eq(&Vec3::new(12.0, 2.0, 2.0), 1e-5));
    }
}
