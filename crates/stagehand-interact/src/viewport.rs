//! Viewport - the interactive session over one scene
//!
//! Owns the scene graph, the camera rigs, the camera controls, the drag
//! controller and the gizmo selection, and routes window input to them.
//! Each call to `dispatch` is one turn: deferred control work runs before
//! it returns.

use crate::camera::{Camera, CameraRigs};
use crate::config::ViewerConfig;
use crate::control::{CameraControl, OrbitControls};
use crate::drag::{DragController, DragOutcome};
use crate::frame::Frame;
use crate::picking::{PickService, ScenePicker};
use crate::pointer::{PointerButton, PointerEvent, PointerKind};
use crate::script::{PointerScript, ScriptEvent};
use crate::selection::GizmoSelection;
use stagehand_core::{LightEdit, NodeId, Result, StagehandError, Vec3};
use stagehand_scene::{SceneGraph, SceneMetadata};

/// Camera controls the viewport can forward raw input to
pub trait NavigationInput: CameraControl {
    fn pointer(&mut self, kind: PointerKind, button: PointerButton, x: f32, y: f32, camera: &mut Camera) -> bool;
    fn wheel(&mut self, lines: f32, camera: &mut Camera) -> bool;
}

impl NavigationInput for OrbitControls {
    fn pointer(&mut self, kind: PointerKind, button: PointerButton, x: f32, y: f32, camera: &mut Camera) -> bool {
        self.handle_pointer(kind, button, x, y, camera)
    }

    fn wheel(&mut self, lines: f32, camera: &mut Camera) -> bool {
        self.handle_wheel(lines, camera)
    }
}

pub struct Viewport<C: NavigationInput = OrbitControls> {
    graph: SceneGraph,
    metadata: SceneMetadata,
    rigs: CameraRigs,
    control: C,
    drag: DragController,
    selection: GizmoSelection,
    config: ViewerConfig,
    size: [f32; 2],
    disposed: bool,
}

impl Viewport<OrbitControls> {
    /// Viewport with the default orbit navigation
    pub fn with_orbit_controls(
        graph: SceneGraph,
        metadata: SceneMetadata,
        config: ViewerConfig,
        size: [f32; 2],
    ) -> Result<Self> {
        let control = OrbitControls::new(&config.camera);
        Self::new(graph, metadata, control, config, size)
    }
}

impl<C: NavigationInput> Viewport<C> {
    /// Fails if the scene has no ground to drag across
    pub fn new(
        graph: SceneGraph,
        metadata: SceneMetadata,
        control: C,
        config: ViewerConfig,
        size: [f32; 2],
    ) -> Result<Self> {
        let ground = graph
            .ground()
            .ok_or_else(|| StagehandError::SceneError("scene has no ground node".to_string()))?;
        let mut rigs = CameraRigs::from_scene(&graph, &config.camera);
        rigs.set_aspect(aspect(size));
        let selection = GizmoSelection::from_scene(&graph);

        let mut viewport = Self {
            graph,
            metadata,
            rigs,
            control,
            drag: DragController::new(ground),
            selection,
            config,
            size,
            disposed: false,
        };
        viewport.apply_ambient();
        Ok(viewport)
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn metadata(&self) -> &SceneMetadata {
        &self.metadata
    }

    pub fn rigs(&self) -> &CameraRigs {
        &self.rigs
    }

    pub fn camera(&self) -> &Camera {
        self.rigs.camera()
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn selection(&self) -> &GizmoSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut GizmoSelection {
        &mut self.selection
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn size(&self) -> [f32; 2] {
        self.size
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = [width, height];
        self.rigs.set_aspect(aspect(self.size));
    }

    /// Handle one pointer event as a full turn. Input after `dispose` is ignored.
    pub fn dispatch(&mut self, kind: PointerKind, button: PointerButton, x: f32, y: f32) -> DragOutcome {
        if self.disposed {
            return DragOutcome::Ignored;
        }
        let picker = ScenePicker::new(&self.graph, self.rigs.camera(), self.size);
        let pick = match kind {
            PointerKind::Down => {
                let graph = &self.graph;
                picker.pick(x, y, &|id| graph.is_pickable(id))
            }
            _ => None,
        };
        let event = PointerEvent {
            kind,
            button,
            x,
            y,
            pick,
        };

        let outcome = self.drag.handle(&event, &picker, &mut self.graph, &mut self.control);

        match outcome {
            DragOutcome::Deselected => self.selection.detach(),
            _ => {
                if let (PointerKind::Down, PointerButton::Primary, Some(hit)) = (kind, button, pick) {
                    self.selection.attach_for(&self.graph, hit.node);
                }
            }
        }

        if self.control.is_attached() {
            self.control.pointer(kind, button, x, y, self.rigs.camera_mut());
        }

        self.drag.flush(&mut self.control);

        if matches!(outcome, DragOutcome::Moved { .. }) {
            self.rigs.sync(&self.graph, &self.config.camera);
        }
        outcome
    }

    pub fn wheel(&mut self, lines: f32) -> bool {
        if self.disposed {
            return false;
        }
        self.control.wheel(lines, self.rigs.camera_mut())
    }

    /// Keyboard shortcuts: `c` cycles cameras. Returns true if handled.
    pub fn key_pressed(&mut self, key: char) -> bool {
        match key.to_ascii_lowercase() {
            'c' => {
                self.cycle_camera();
                true
            }
            _ => false,
        }
    }

    pub fn cycle_camera(&mut self) {
        self.rigs.cycle();
        self.apply_ambient();
    }

    pub fn select_camera(&mut self, name: &str) -> Result<()> {
        if !self.rigs.select(name) {
            return Err(StagehandError::NodeNotFound(name.to_string()));
        }
        self.apply_ambient();
        Ok(())
    }

    /// Dim the ambient light while looking through the overhead camera
    fn apply_ambient(&mut self) {
        let ambient = &self.config.ambient;
        let Some(light) = self.graph.node_by_name(&ambient.light) else {
            return;
        };
        let intensity = if self.rigs.active().name == ambient.overhead_camera {
            ambient.overhead_intensity
        } else {
            ambient.default_intensity
        };
        if let Err(err) = self.graph.edit_light(light, LightEdit::Intensity(intensity)) {
            log::warn!("could not set ambient intensity: {}", err);
        }
    }

    pub fn edit_light(&mut self, light: NodeId, edit: LightEdit) -> Result<()> {
        self.graph.edit_light(light, edit)
    }

    /// Root of the first mounted camera, which the rotation slider turns
    pub fn camera_rig(&self) -> Option<NodeId> {
        self.rigs
            .rigs()
            .iter()
            .filter(|rig| rig.mounted)
            .find_map(|rig| rig.node)
            .map(|node| self.graph.topmost_ancestor(node))
    }

    /// Yaw of the camera rig in degrees
    pub fn rig_yaw(&self) -> Option<f32> {
        let rig = self.camera_rig()?;
        self.graph.transform(rig).map(|t| t.rotation.y)
    }

    pub fn set_rig_yaw(&mut self, degrees: f32) -> Result<()> {
        let rig = self
            .camera_rig()
            .ok_or_else(|| StagehandError::NodeNotFound("camera rig".to_string()))?;
        let rotation = self.graph.transform(rig).map(|t| t.rotation).unwrap_or(Vec3::ZERO);
        self.graph.set_rotation(rig, Vec3::new(rotation.x, degrees, rotation.z))?;
        self.rigs.sync(&self.graph, &self.config.camera);
        Ok(())
    }

    /// Wireframe of what the active camera sees
    pub fn frame(&self) -> Frame {
        self.frame_at(self.size)
    }

    /// Same view at another resolution (screenshots)
    pub fn frame_at(&self, size: [f32; 2]) -> Frame {
        let mut camera = self.rigs.camera().clone();
        camera.aspect = aspect(size);
        Frame::build(&self.graph, &camera, size, &self.selection, self.rigs.active().node)
    }

    /// Feed a recorded script through as if it came from the window
    pub fn replay(&mut self, script: &PointerScript) -> Vec<DragOutcome> {
        if let Some([w, h]) = script.viewport {
            self.resize(w, h);
        }
        let mut outcomes = Vec::new();
        for event in &script.events {
            match *event {
                ScriptEvent::Down { x, y, button } => {
                    outcomes.push(self.dispatch(PointerKind::Down, button, x, y))
                }
                ScriptEvent::Move { x, y } => {
                    outcomes.push(self.dispatch(PointerKind::Move, PointerButton::Primary, x, y))
                }
                ScriptEvent::Up { x, y, button } => {
                    outcomes.push(self.dispatch(PointerKind::Up, button, x, y))
                }
                ScriptEvent::Wheel { lines } => {
                    self.wheel(lines);
                }
                ScriptEvent::Key { key } => {
                    self.key_pressed(key);
                }
            }
        }
        outcomes
    }

    /// End the session. An active drag is closed and camera control
    /// reattached; calling this again does nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.drag.dispose(&mut self.control);
        self.disposed = true;
    }
}

impl<C: NavigationInput> Drop for Viewport<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn aspect(size: [f32; 2]) -> f32 {
    if size[1] > 0.0 {
        size[0] / size[1]
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::world_to_screen;
    use stagehand_scene::studio_scene;

    const SIZE: [f32; 2] = [800.0, 600.0];

    fn studio() -> Viewport {
        let (graph, file) = studio_scene().unwrap();
        Viewport::with_orbit_controls(graph, file.scene, ViewerConfig::default(), SIZE).unwrap()
    }

    /// Screen position of the middle of the character's body
    fn body_point(viewport: &Viewport) -> [f32; 2] {
        let body = viewport.graph().node_by_name("woman_body").unwrap();
        let middle = stagehand_core::mat4_transform_point(
            &viewport.graph().world_matrix(body),
            Vec3::new(0.0, -420.0, 0.0),
        );
        world_to_screen(viewport.camera(), SIZE, middle).unwrap()
    }

    fn env_intensity(viewport: &Viewport) -> f32 {
        let env = viewport.graph().node_by_name("envLight").unwrap();
        viewport.graph().light(env).unwrap().intensity
    }

    #[test]
    fn test_scene_without_ground_rejected() {
        let graph = SceneGraph::new();
        let metadata = stagehand_scene::SceneFile::new("empty").scene;
        assert!(Viewport::with_orbit_controls(graph, metadata, ViewerConfig::default(), SIZE).is_err());
    }

    #[test]
    fn test_drag_character_across_ground() {
        let mut viewport = studio();
        let woman = viewport.graph().node_by_name("woman").unwrap();
        let start = viewport.graph().position(woman).unwrap();

        let [x, y] = body_point(&viewport);

        let outcome = viewport.dispatch(PointerKind::Down, PointerButton::Primary, x, y);
        assert!(matches!(outcome, DragOutcome::Started { target, .. } if target == woman));
        assert!(!viewport.control().is_attached());
        assert_eq!(viewport.selection().attached(), Some(woman));

        let outcome = viewport.dispatch(PointerKind::Move, PointerButton::Primary, x + 40.0, y);
        assert!(matches!(outcome, DragOutcome::Moved { .. }));
        let moved = viewport.graph().position(woman).unwrap();
        assert!((moved.y - start.y).abs() < 1e-3);
        assert!(moved.distance(&start) > 1.0);

        let outcome = viewport.dispatch(PointerKind::Up, PointerButton::Primary, x + 40.0, y);
        assert!(matches!(outcome, DragOutcome::Ended { .. }));
        assert!(viewport.control().is_attached());
    }

    #[test]
    fn test_ground_click_detaches_gizmo() {
        let mut viewport = studio();
        let [x, y] = body_point(&viewport);
        viewport.dispatch(PointerKind::Down, PointerButton::Primary, x, y);
        viewport.dispatch(PointerKind::Up, PointerButton::Primary, x, y);

        // Open ground between the camera and the stage
        let [gx, gy] = world_to_screen(viewport.camera(), SIZE, Vec3::new(20.0, 0.0, 30.0)).unwrap();
        let outcome = viewport.dispatch(PointerKind::Down, PointerButton::Primary, gx, gy);
        assert_eq!(outcome, DragOutcome::Deselected);
        assert_eq!(viewport.selection().attached(), None);
        assert!(viewport.control().is_attached());
    }

    #[test]
    fn test_camera_cycle_switches_ambient() {
        let mut viewport = studio();
        assert_eq!(viewport.rigs().active().name, "Camera");
        assert!((env_intensity(&viewport) - 0.6).abs() < 1e-6);

        assert!(viewport.key_pressed('c'));
        assert_eq!(viewport.rigs().active().name, "camera-1");
        assert!(viewport.key_pressed('C'));
        assert_eq!(viewport.rigs().active().name, "camera-god");
        assert!((env_intensity(&viewport) - 0.4).abs() < 1e-6);

        viewport.cycle_camera();
        assert!((env_intensity(&viewport) - 0.6).abs() < 1e-6);
        assert!(!viewport.key_pressed('x'));
    }

    #[test]
    fn test_rig_rotation_moves_mounted_camera() {
        let mut viewport = studio();
        viewport.select_camera("camera-1").unwrap();
        assert!((viewport.rig_yaw().unwrap() - 219.6).abs() < 1e-3);
        let before = viewport.camera().forward();

        viewport.set_rig_yaw(90.0).unwrap();
        assert!((viewport.rig_yaw().unwrap() - 90.0).abs() < 1e-6);
        assert!(!viewport.camera().forward().approx_eq(&before, 1e-3));
    }

    #[test]
    fn test_dispose_mid_drag_reattaches() {
        let mut viewport = studio();
        let [x, y] = body_point(&viewport);
        viewport.dispatch(PointerKind::Down, PointerButton::Primary, x, y);
        assert!(viewport.drag().is_dragging());
        assert!(!viewport.control().is_attached());

        viewport.dispose();
        assert!(viewport.control().is_attached());
        assert!(!viewport.drag().is_dragging());
        viewport.dispose();
    }

    #[test]
    fn test_input_after_dispose_is_ignored() {
        let mut viewport = studio();
        let woman = viewport.graph().node_by_name("woman").unwrap();
        let start = viewport.graph().position(woman).unwrap();
        let camera = viewport.camera().position;
        viewport.dispose();

        let [x, y] = body_point(&viewport);
        let outcome = viewport.dispatch(PointerKind::Down, PointerButton::Primary, x, y);
        assert_eq!(outcome, DragOutcome::Ignored);
        assert!(!viewport.drag().is_dragging());
        assert!(viewport.control().is_attached());

        let outcome = viewport.dispatch(PointerKind::Move, PointerButton::Primary, x + 40.0, y);
        assert_eq!(outcome, DragOutcome::Ignored);
        assert!(!viewport.wheel(3.0));
        assert!(viewport.graph().position(woman).unwrap().approx_eq(&start, 1e-6));
        assert!(viewport.camera().position.approx_eq(&camera, 1e-6));

        // Drop runs dispose again
        viewport.dispose();
        assert!(viewport.control().is_attached());
    }

    #[test]
    fn test_replay_script() {
        let mut viewport = studio();
        let [x, y] = body_point(&viewport);
        let script = PointerScript {
            viewport: Some(SIZE),
            events: vec![
                ScriptEvent::Down { x, y, button: PointerButton::Primary },
                ScriptEvent::Move { x: x + 25.0, y },
                ScriptEvent::Up { x: x + 25.0, y, button: PointerButton::Primary },
                ScriptEvent::Key { key: 'c' },
            ],
        };

        let outcomes = viewport.replay(&script);
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], DragOutcome::Started { .. }));
        assert!(matches!(outcomes[2], DragOutcome::Ended { .. }));
        assert_eq!(viewport.rigs().active().name, "camera-1");
    }

    #[test]
    fn test_orbit_when_pressing_empty_space() {
        let mut viewport = studio();
        let before = viewport.camera().position;
        // Top-left corner looks past the ground into the sky
        viewport.dispatch(PointerKind::Down, PointerButton::Primary, 1.0, 1.0);
        viewport.dispatch(PointerKind::Move, PointerButton::Primary, 60.0, 1.0);
        viewport.dispatch(PointerKind::Up, PointerButton::Primary, 60.0, 1.0);
        assert!(!viewport.camera().position.approx_eq(&before, 1e-3));
    }
}
