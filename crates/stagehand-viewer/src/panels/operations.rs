//! Gizmo toggles, camera controls and the screenshot button

use stagehand_interact::GizmoSelection;

/// Actions returned by the panel that the app must handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperationAction {
    CycleCamera,
    /// New camera rig yaw in degrees
    RotateRig(f32),
    Screenshot,
}

/// What the panel shows besides the gizmo toggles
pub struct OperationsView<'a> {
    pub active_camera: &'a str,
    pub rig_yaw: Option<f32>,
    pub last_screenshot: Option<&'a str>,
}

/// Draw the operations panel. Gizmo toggles are written straight into
/// `selection`; everything else comes back as actions.
pub fn operations_panel(
    ui: &mut egui::Ui,
    selection: &mut GizmoSelection,
    view: &OperationsView,
) -> Vec<OperationAction> {
    let mut actions = Vec::new();

    ui.heading("Operations");
    ui.separator();

    ui.checkbox(&mut selection.position_gizmo, "Position gizmo");
    ui.checkbox(&mut selection.rotation_gizmo, "Rotation gizmo");

    ui.separator();
    ui.horizontal(|ui| {
        ui.label("Camera:");
        ui.monospace(view.active_camera);
    });
    if ui.button("Next camera (C)").clicked() {
        actions.push(OperationAction::CycleCamera);
    }

    if let Some(yaw) = view.rig_yaw {
        let mut yaw = yaw.rem_euclid(360.0);
        let slider = egui::Slider::new(&mut yaw, 0.0..=360.0)
            .text("Rig rotation")
            .suffix("\u{00b0}");
        if ui.add(slider).changed() {
            actions.push(OperationAction::RotateRig(yaw));
        }
    }

    ui.separator();
    if ui.button("Screenshot").clicked() {
        actions.push(OperationAction::Screenshot);
    }
    if let Some(path) = view.last_screenshot {
        ui.weak(path);
    }

    actions
}
