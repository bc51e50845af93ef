//! Cameras with orbit and free modes, and the rig list the user cycles through

use crate::config::CameraSettings;
use stagehand_core::{mat4_inverse, mat4_mul, NodeId, Vec3};
use stagehand_scene::{CameraDef, NodeKind, SceneGraph};

/// Camera operating mode
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CameraMode {
    /// Orbit around a target point
    #[default]
    Orbit,
    /// Fixed position looking at a target
    Free,
}

/// A perspective camera
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Width / height
    pub aspect: f32,

    // Orbit state
    pub distance: f32,
    /// Horizontal angle in radians
    pub yaw: f32,
    /// Elevation above the target's horizon in radians
    pub pitch: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    pub mode: CameraMode,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::UP,
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
            distance: 180.0,
            yaw: std::f32::consts::FRAC_PI_2,
            pitch: 0.77,
            min_pitch: 0.0,
            max_pitch: 1.56,
            min_distance: 1.0,
            max_distance: 1000.0,
            mode: CameraMode::Orbit,
        };
        camera.update_orbit();
        camera
    }
}

impl Camera {
    /// Orbit camera; angles in degrees
    pub fn orbit(target: Vec3, yaw_deg: f32, pitch_deg: f32, distance: f32, settings: &CameraSettings) -> Self {
        let mut camera = Self {
            target,
            yaw: yaw_deg.to_radians(),
            min_pitch: settings.min_pitch.to_radians(),
            max_pitch: settings.max_pitch.to_radians(),
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
            far: settings.far,
            fov: settings.fov,
            ..Self::default()
        };
        camera.pitch = pitch_deg.to_radians().clamp(camera.min_pitch, camera.max_pitch);
        camera.distance = distance.clamp(camera.min_distance, camera.max_distance);
        camera.update_orbit();
        camera
    }

    pub fn free(position: Vec3, target: Vec3, settings: &CameraSettings) -> Self {
        Self {
            position,
            target,
            mode: CameraMode::Free,
            far: settings.far,
            fov: settings.fov,
            ..Self::default()
        }
    }

    /// Update position based on orbit parameters
    pub fn update_orbit(&mut self) {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.position = self.target + Vec3::new(x, y, z);
    }

    /// Orbit horizontally (rotate around target)
    pub fn orbit_horizontal(&mut self, delta: f32) {
        if self.mode != CameraMode::Orbit {
            return;
        }
        self.yaw += delta;
        self.update_orbit();
    }

    /// Orbit vertically, within the pitch limits
    pub fn orbit_vertical(&mut self, delta: f32) {
        if self.mode != CameraMode::Orbit {
            return;
        }
        self.pitch = (self.pitch + delta).clamp(self.min_pitch, self.max_pitch);
        self.update_orbit();
    }

    /// Move toward (positive) or away from the target, within the distance limits
    pub fn zoom(&mut self, delta: f32) {
        match self.mode {
            CameraMode::Orbit => {
                self.distance = (self.distance - delta).clamp(self.min_distance, self.max_distance);
                self.update_orbit();
            }
            CameraMode::Free => {
                let forward = self.forward();
                self.position = self.position + forward * delta;
                self.target = self.target + forward * delta;
            }
        }
    }

    /// Slide the target (and the camera with it) in the view plane
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if self.mode != CameraMode::Orbit {
            return;
        }
        let (_, right, up) = self.basis();
        self.target = self.target + right * dx + up * dy;
        self.update_orbit();
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalized()
    }

    /// Forward, right and up unit vectors. Falls back to -Z as the
    /// reference up when looking straight along the up axis.
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let f = self.forward();
        let mut s = f.cross(&self.up);
        if s.length() < 1e-6 {
            s = f.cross(&Vec3::new(0.0, 0.0, -1.0));
        }
        let s = s.normalized();
        let u = s.cross(&f);
        (f, s, u)
    }

    /// View matrix (column-major)
    pub fn view_matrix(&self) -> [[f32; 4]; 4] {
        let (f, s, u) = self.basis();
        [
            [s.x, u.x, -f.x, 0.0],
            [s.y, u.y, -f.y, 0.0],
            [s.z, u.z, -f.z, 0.0],
            [
                -s.dot(&self.position),
                -u.dot(&self.position),
                f.dot(&self.position),
                1.0,
            ],
        ]
    }

    /// Perspective projection matrix (column-major, OpenGL depth range)
    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        let f = 1.0 / (self.fov.to_radians() / 2.0).tan();
        let depth = self.far - self.near;
        [
            [f / self.aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, -(self.far + self.near) / depth, -1.0],
            [0.0, 0.0, -(2.0 * self.far * self.near) / depth, 0.0],
        ]
    }

    pub fn view_projection_matrix(&self) -> [[f32; 4]; 4] {
        mat4_mul(&self.projection_matrix(), &self.view_matrix())
    }

    /// Inverse view-projection, for unprojecting screen points
    pub fn inverse_view_projection_matrix(&self) -> Option<[[f32; 4]; 4]> {
        mat4_inverse(&self.view_projection_matrix())
    }

    /// View-space depth of a point (positive in front of the camera)
    pub fn depth_of(&self, p: Vec3) -> f32 {
        let view = self.view_matrix();
        -(view[0][2] * p.x + view[1][2] * p.y + view[2][2] * p.z + view[3][2])
    }
}

/// A camera built from a camera node
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub name: String,
    pub node: Option<NodeId>,
    pub camera: Camera,
    /// Parented under another node, so it follows that node around
    pub mounted: bool,
}

/// The scene's cameras in declaration order, one of them active
#[derive(Debug, Clone)]
pub struct CameraRigs {
    rigs: Vec<CameraRig>,
    active: usize,
}

impl CameraRigs {
    /// Build rigs from every camera node. A scene without cameras gets a
    /// default orbit camera so the viewport always has one.
    pub fn from_scene(graph: &SceneGraph, settings: &CameraSettings) -> Self {
        let mut rigs: Vec<CameraRig> = graph
            .cameras()
            .into_iter()
            .map(|(id, def)| CameraRig {
                name: graph.name(id).unwrap_or_default().to_string(),
                node: Some(id),
                camera: camera_for_node(graph, id, &def, settings),
                mounted: graph.parent(id).is_some(),
            })
            .collect();

        if rigs.is_empty() {
            rigs.push(CameraRig {
                name: "default".to_string(),
                node: None,
                camera: Camera::orbit(Vec3::ZERO, 90.0, 44.2, 180.0, settings),
                mounted: false,
            });
        }

        let active = settings
            .initial
            .as_deref()
            .and_then(|name| rigs.iter().position(|r| r.name == name))
            .unwrap_or(0);

        Self { rigs, active }
    }

    pub fn len(&self) -> usize {
        self.rigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rigs.is_empty()
    }

    pub fn rigs(&self) -> &[CameraRig] {
        &self.rigs
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &CameraRig {
        &self.rigs[self.active]
    }

    pub fn active_mut(&mut self) -> &mut CameraRig {
        &mut self.rigs[self.active]
    }

    pub fn camera(&self) -> &Camera {
        &self.active().camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.active_mut().camera
    }

    /// Advance to the next rig, wrapping around
    pub fn cycle(&mut self) -> &CameraRig {
        self.active = (self.active + 1) % self.rigs.len();
        log::info!("active camera: {}", self.rigs[self.active].name);
        &self.rigs[self.active]
    }

    pub fn select(&mut self, name: &str) -> bool {
        match self.rigs.iter().position(|r| r.name == name) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        for rig in &mut self.rigs {
            rig.camera.aspect = aspect;
        }
    }

    /// Re-read free cameras from their nodes, so mounted cameras follow
    /// their rig after it is dragged or rotated
    pub fn sync(&mut self, graph: &SceneGraph, settings: &CameraSettings) {
        for rig in &mut self.rigs {
            let Some(node) = rig.node else { continue };
            if rig.camera.mode != CameraMode::Free {
                continue;
            }
            if let Some(NodeKind::Camera(def)) = graph.kind(node) {
                let aspect = rig.camera.aspect;
                rig.camera = camera_for_node(graph, node, &def, settings);
                rig.camera.aspect = aspect;
            }
        }
    }
}

fn camera_for_node(graph: &SceneGraph, id: NodeId, def: &CameraDef, settings: &CameraSettings) -> Camera {
    match def {
        CameraDef::Orbit {
            target,
            yaw,
            pitch,
            distance,
        } => Camera::orbit(*target, *yaw, *pitch, *distance, settings),
        CameraDef::Free { look_at } => {
            let world = graph.world_matrix(id);
            let position = Vec3::new(world[3][0], world[3][1], world[3][2]);
            let target = match look_at {
                Some(point) => *point,
                None => {
                    // Local -Z in world space
                    let forward = Vec3::new(-world[2][0], -world[2][1], -world[2][2]).normalized();
                    position + forward
                }
            };
            Camera::free(position, target, settings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_scene::studio_scene;

    fn settings() -> CameraSettings {
        CameraSettings::default()
    }

    #[test]
    fn test_orbit_position() {
        let camera = Camera::orbit(Vec3::ZERO, 90.0, 0.0, 10.0, &CameraSettings {
            min_pitch: -10.0,
            ..settings()
        });
        assert!(camera.position.approx_eq(&Vec3::new(10.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn test_pitch_and_distance_limits() {
        let mut camera = Camera::orbit(Vec3::ZERO, 0.0, 45.0, 180.0, &settings());
        camera.orbit_vertical(10.0);
        assert!((camera.pitch - settings().max_pitch.to_radians()).abs() < 1e-5);
        camera.orbit_vertical(-10.0);
        assert!((camera.pitch - settings().min_pitch.to_radians()).abs() < 1e-5);

        camera.zoom(10_000.0);
        assert_eq!(camera.distance, settings().min_distance);
        camera.zoom(-10_000.0);
        assert_eq!(camera.distance, settings().max_distance);
    }

    #[test]
    fn test_top_down_view_is_finite() {
        let camera = Camera::free(Vec3::new(0.0, 200.0, 0.0), Vec3::ZERO, &settings());
        let view = camera.view_matrix();
        assert!(view.iter().flatten().all(|v| v.is_finite()));
        assert!(camera.inverse_view_projection_matrix().is_some());
        assert!((camera.depth_of(Vec3::ZERO) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_free_camera_ignores_orbit_input() {
        let mut camera = Camera::free(Vec3::new(0.0, 5.0, 5.0), Vec3::ZERO, &settings());
        let before = camera.position;
        camera.orbit_horizontal(1.0);
        camera.pan(3.0, 3.0);
        assert_eq!(camera.position, before);
    }

    #[test]
    fn test_rigs_cycle_and_wrap() {
        let (graph, _) = studio_scene().unwrap();
        let mut rigs = CameraRigs::from_scene(&graph, &settings());
        assert_eq!(rigs.len(), 3);
        assert_eq!(rigs.active().name, "Camera");

        assert_eq!(rigs.cycle().name, "camera-1");
        assert_eq!(rigs.cycle().name, "camera-god");
        assert_eq!(rigs.cycle().name, "Camera");
        assert!(rigs.active().node.is_some());
    }

    #[test]
    fn test_mounted_camera_follows_rig() {
        let (mut graph, _) = studio_scene().unwrap();
        let mut rigs = CameraRigs::from_scene(&graph, &settings());
        assert!(rigs.select("camera-1"));
        assert!(rigs.active().mounted);
        let before = rigs.camera().position;

        let rig = graph.node_by_name("camera_rig").unwrap();
        graph.translate(rig, Vec3::new(5.0, 0.0, 0.0)).unwrap();
        rigs.sync(&graph, &settings());

        let after = rigs.camera().position;
        assert!((after - before).approx_eq(&Vec3::new(5.0, 0.0, 0.0), 1e-3));
    }

    #[test]
    fn test_scene_without_cameras_gets_default() {
        let graph = SceneGraph::new();
        let rigs = CameraRigs::from_scene(&graph, &settings());
        assert_eq!(rigs.len(), 1);
        assert!(rigs.active().node.is_none());
    }
}
