//! Screen-space wireframe of the scene as seen by a camera
//!
//! The viewer paints a `Frame` over its viewport and the screenshot path
//! rasterizes the same frame, so both always agree on what is visible.

use crate::camera::Camera;
use crate::projection::world_to_screen;
use crate::selection::GizmoSelection;
use stagehand_core::{mat4_transform_point, Color, LightKind, NodeId, Vec3};
use stagehand_scene::{NodeKind, SceneGraph};

pub const BACKGROUND: [u8; 3] = [24, 26, 30];
const GRID: [u8; 3] = [62, 72, 64];
const MESH: [u8; 3] = [196, 200, 206];
const SELECTED: [u8; 3] = [255, 210, 0];
const LIGHT_OFF: [u8; 3] = [90, 90, 90];
const CAMERA: [u8; 3] = [120, 160, 255];
const ROTATION_RING: [u8; 3] = [255, 160, 0];

const GRID_SPACING: f32 = 10.0;
const MARKER_SIZE: f32 = 1.5;
const GIZMO_SIZE: f32 = 8.0;

/// A projected line segment in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub color: [u8; 3],
    pub width: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub size: [f32; 2],
    pub segments: Vec<Segment>,
}

impl Frame {
    /// Project the scene through `camera` into a `size` viewport. `skip` is
    /// left out of the drawing (the camera node being looked through).
    pub fn build(
        graph: &SceneGraph,
        camera: &Camera,
        size: [f32; 2],
        selection: &GizmoSelection,
        skip: Option<NodeId>,
    ) -> Self {
        let mut builder = FrameBuilder {
            camera,
            size,
            segments: Vec::new(),
        };

        for &id in graph.nodes() {
            if Some(id) == skip {
                continue;
            }
            let Some(kind) = graph.kind(id) else { continue };
            match kind {
                NodeKind::Ground { width, depth } => {
                    let Some(center) = graph.world_position(id) else { continue };
                    builder.grid(center, width, depth);
                }
                NodeKind::Mesh { bounds, emissive } => {
                    let selected = selection
                        .attached()
                        .is_some_and(|root| root == id || graph.is_descendant_of(id, root));
                    let (color, width) = if selected {
                        (SELECTED, 2.0)
                    } else {
                        (emissive.map(|c| c.to_rgb8()).unwrap_or(MESH), 1.0)
                    };
                    let world = graph.world_matrix(id);
                    let corners = bounds.corners().map(|c| mat4_transform_point(&world, c));
                    builder.cuboid(&corners, color, width);
                }
                NodeKind::Light(light) => {
                    let Some(position) = graph.world_position(id) else { continue };
                    let color = if light.enabled {
                        light.diffuse.to_rgb8()
                    } else {
                        LIGHT_OFF
                    };
                    builder.cross(position, color);
                    let direction = match light.kind {
                        LightKind::Directional { direction } | LightKind::Spot { direction, .. } => {
                            Some(direction)
                        }
                        _ => None,
                    };
                    if let Some(direction) = direction {
                        builder.line(position, position + direction.normalized() * 5.0, color, 1.0);
                    }
                }
                NodeKind::Camera(_) => {
                    if let Some(position) = graph.world_position(id) {
                        builder.cross(position, CAMERA);
                    }
                }
                NodeKind::Group => {}
            }
        }

        if let Some(root) = selection.attached() {
            if let Some(origin) = graph.world_position(root) {
                if selection.position_gizmo {
                    builder.axes(origin);
                }
                if selection.rotation_gizmo {
                    builder.ring(origin, GIZMO_SIZE * 0.75, ROTATION_RING);
                }
            }
        }

        Self {
            size,
            segments: builder.segments,
        }
    }
}

struct FrameBuilder<'a> {
    camera: &'a Camera,
    size: [f32; 2],
    segments: Vec<Segment>,
}

impl FrameBuilder<'_> {
    /// Clip a world-space segment to the near plane, project it and keep it
    fn line(&mut self, mut a: Vec3, mut b: Vec3, color: [u8; 3], width: f32) {
        let near = self.camera.near + 1e-3;
        let da = self.camera.depth_of(a);
        let db = self.camera.depth_of(b);
        if da < near && db < near {
            return;
        }
        if da < near {
            a = a + (b - a) * ((near - da) / (db - da));
        } else if db < near {
            b = b + (a - b) * ((near - db) / (da - db));
        }

        if let (Some(from), Some(to)) = (
            world_to_screen(self.camera, self.size, a),
            world_to_screen(self.camera, self.size, b),
        ) {
            self.segments.push(Segment {
                from,
                to,
                color,
                width,
            });
        }
    }

    fn grid(&mut self, center: Vec3, width: f32, depth: f32) {
        let (hw, hd) = (width / 2.0, depth / 2.0);
        let columns = (width / GRID_SPACING).floor() as i32;
        for i in 0..=columns {
            let x = center.x - hw + i as f32 * GRID_SPACING;
            self.line(
                Vec3::new(x, center.y, center.z - hd),
                Vec3::new(x, center.y, center.z + hd),
                GRID,
                1.0,
            );
        }
        let rows = (depth / GRID_SPACING).floor() as i32;
        for i in 0..=rows {
            let z = center.z - hd + i as f32 * GRID_SPACING;
            self.line(
                Vec3::new(center.x - hw, center.y, z),
                Vec3::new(center.x + hw, center.y, z),
                GRID,
                1.0,
            );
        }
    }

    /// Corners in `Bounds::corners` order
    fn cuboid(&mut self, c: &[Vec3; 8], color: [u8; 3], width: f32) {
        const EDGES: [(usize, usize); 12] = [
            (0, 1), (1, 2), (2, 3), (3, 0),
            (4, 5), (5, 6), (6, 7), (7, 4),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];
        for (a, b) in EDGES {
            self.line(c[a], c[b], color, width);
        }
    }

    fn cross(&mut self, p: Vec3, color: [u8; 3]) {
        let s = MARKER_SIZE;
        self.line(p - Vec3::new(s, 0.0, 0.0), p + Vec3::new(s, 0.0, 0.0), color, 1.5);
        self.line(p - Vec3::new(0.0, s, 0.0), p + Vec3::new(0.0, s, 0.0), color, 1.5);
        self.line(p - Vec3::new(0.0, 0.0, s), p + Vec3::new(0.0, 0.0, s), color, 1.5);
    }

    fn axes(&mut self, origin: Vec3) {
        let red = Color::RED.to_rgb8();
        self.line(origin, origin + Vec3::new(GIZMO_SIZE, 0.0, 0.0), red, 2.5);
        self.line(origin, origin + Vec3::new(0.0, GIZMO_SIZE, 0.0), [60, 200, 80], 2.5);
        self.line(origin, origin + Vec3::new(0.0, 0.0, GIZMO_SIZE), [70, 120, 255], 2.5);
    }

    fn ring(&mut self, center: Vec3, radius: f32, color: [u8; 3]) {
        const STEPS: usize = 32;
        let point = |i: usize| {
            let angle = i as f32 / STEPS as f32 * std::f32::consts::TAU;
            center + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        };
        for i in 0..STEPS {
            self.line(point(i), point(i + 1), color, 2.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraRigs;
    use crate::config::CameraSettings;
    use stagehand_scene::studio_scene;

    fn studio_frame(graph: &SceneGraph, selection: &GizmoSelection) -> Frame {
        let rigs = CameraRigs::from_scene(graph, &CameraSettings::default());
        Frame::build(graph, rigs.camera(), [800.0, 450.0], selection, rigs.active().node)
    }

    #[test]
    fn test_studio_frame_has_geometry_on_screen() {
        let (graph, _) = studio_scene().unwrap();
        let frame = studio_frame(&graph, &GizmoSelection::default());
        assert!(!frame.segments.is_empty());
        assert!(frame
            .segments
            .iter()
            .all(|s| s.from.iter().chain(s.to.iter()).all(|v| v.is_finite())));
        assert!(frame.segments.iter().any(|s| s.color == GRID));
    }

    #[test]
    fn test_selection_and_gizmos_are_drawn() {
        let (graph, _) = studio_scene().unwrap();
        let mut selection = GizmoSelection::from_scene(&graph);
        let woman = graph.node_by_name("woman_body").unwrap();
        selection.attach_for(&graph, woman);
        selection.position_gizmo = true;
        selection.rotation_gizmo = true;

        let frame = studio_frame(&graph, &selection);
        assert!(frame.segments.iter().any(|s| s.color == SELECTED));
        assert!(frame.segments.iter().any(|s| s.color == ROTATION_RING));
    }

    #[test]
    fn test_lines_behind_camera_are_clipped() {
        let camera = Camera::free(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -10.0), &CameraSettings::default());
        let mut builder = FrameBuilder {
            camera: &camera,
            size: [100.0, 100.0],
            segments: Vec::new(),
        };
        builder.line(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 10.0), MESH, 1.0);
        assert!(builder.segments.is_empty());

        builder.line(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -10.0), MESH, 1.0);
        assert_eq!(builder.segments.len(), 1);
    }
}
