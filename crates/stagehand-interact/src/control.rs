//! User camera navigation and the attach/detach seam the drag controller uses

use crate::camera::Camera;
use crate::config::CameraSettings;
use crate::pointer::{PointerButton, PointerKind};

/// Something that turns user input into camera motion and can be switched
/// off while another interaction owns the pointer.
///
/// Callers pair every `detach_control` with exactly one `attach_control`.
pub trait CameraControl {
    fn attach_control(&mut self);
    fn detach_control(&mut self);
    fn is_attached(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Orbit { last: [f32; 2] },
    Pan { last: [f32; 2] },
}

/// Orbit-style navigation: primary drag orbits, secondary or middle drag
/// pans, the wheel zooms. Ignores all input while detached.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    attached: bool,
    gesture: Option<Gesture>,
    orbit_sensitivity: f32,
    pan_sensitivity: f32,
    zoom_sensitivity: f32,
}

impl OrbitControls {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            attached: true,
            gesture: None,
            orbit_sensitivity: settings.orbit_sensitivity,
            pan_sensitivity: settings.pan_sensitivity,
            zoom_sensitivity: settings.zoom_sensitivity,
        }
    }

    /// Feed a pointer event. Returns true if the camera moved.
    pub fn handle_pointer(
        &mut self,
        kind: PointerKind,
        button: PointerButton,
        x: f32,
        y: f32,
        camera: &mut Camera,
    ) -> bool {
        if !self.attached {
            return false;
        }

        match kind {
            PointerKind::Down => {
                self.gesture = Some(match button {
                    PointerButton::Primary => Gesture::Orbit { last: [x, y] },
                    PointerButton::Secondary | PointerButton::Middle => Gesture::Pan { last: [x, y] },
                });
                false
            }
            PointerKind::Move => match &mut self.gesture {
                Some(Gesture::Orbit { last }) => {
                    let (dx, dy) = (x - last[0], y - last[1]);
                    *last = [x, y];
                    camera.orbit_horizontal(-dx * self.orbit_sensitivity);
                    camera.orbit_vertical(dy * self.orbit_sensitivity);
                    dx != 0.0 || dy != 0.0
                }
                Some(Gesture::Pan { last }) => {
                    let (dx, dy) = (x - last[0], y - last[1]);
                    *last = [x, y];
                    let scale = self.pan_sensitivity * camera.distance;
                    camera.pan(-dx * scale, dy * scale);
                    dx != 0.0 || dy != 0.0
                }
                None => false,
            },
            PointerKind::Up => {
                self.gesture = None;
                false
            }
        }
    }

    /// Wheel lines; positive zooms in
    pub fn handle_wheel(&mut self, lines: f32, camera: &mut Camera) -> bool {
        if !self.attached || lines == 0.0 {
            return false;
        }
        camera.zoom(lines * self.zoom_sensitivity);
        true
    }
}

impl CameraControl for OrbitControls {
    fn attach_control(&mut self) {
        self.attached = true;
    }

    fn detach_control(&mut self) {
        self.attached = false;
        self.gesture = None;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_core::Vec3;

    fn setup() -> (OrbitControls, Camera) {
        let settings = CameraSettings::default();
        (
            OrbitControls::new(&settings),
            Camera::orbit(Vec3::ZERO, 90.0, 45.0, 100.0, &settings),
        )
    }

    #[test]
    fn test_primary_drag_orbits() {
        let (mut controls, mut camera) = setup();
        let yaw = camera.yaw;
        controls.handle_pointer(PointerKind::Down, PointerButton::Primary, 100.0, 100.0, &mut camera);
        assert!(controls.handle_pointer(PointerKind::Move, PointerButton::Primary, 150.0, 100.0, &mut camera));
        assert!(camera.yaw < yaw);
        controls.handle_pointer(PointerKind::Up, PointerButton::Primary, 150.0, 100.0, &mut camera);
        assert!(!controls.handle_pointer(PointerKind::Move, PointerButton::Primary, 200.0, 100.0, &mut camera));
    }

    #[test]
    fn test_secondary_drag_pans() {
        let (mut controls, mut camera) = setup();
        controls.handle_pointer(PointerKind::Down, PointerButton::Secondary, 0.0, 0.0, &mut camera);
        controls.handle_pointer(PointerKind::Move, PointerButton::Secondary, 20.0, 0.0, &mut camera);
        assert_ne!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn test_detached_ignores_input_and_drops_gesture() {
        let (mut controls, mut camera) = setup();
        controls.handle_pointer(PointerKind::Down, PointerButton::Primary, 0.0, 0.0, &mut camera);
        controls.detach_control();
        let before = camera.position;
        assert!(!controls.handle_pointer(PointerKind::Move, PointerButton::Primary, 50.0, 50.0, &mut camera));
        assert!(!controls.handle_wheel(3.0, &mut camera));
        assert_eq!(camera.position, before);

        controls.attach_control();
        // The gesture started before the detach is gone
        assert!(!controls.handle_pointer(PointerKind::Move, PointerButton::Primary, 60.0, 60.0, &mut camera));
    }

    #[test]
    fn test_wheel_zooms() {
        let (mut controls, mut camera) = setup();
        assert!(controls.handle_wheel(1.0, &mut camera));
        assert!(camera.distance < 100.0);
    }
}
