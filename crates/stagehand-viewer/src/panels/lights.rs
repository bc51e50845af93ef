//! Light list and per-kind light settings

use stagehand_core::{Color, Light, LightEdit, LightKind, NodeId, Vec3};
use stagehand_scene::SceneGraph;

/// Lights listed by their headers, with settings for the selected one
#[derive(Default)]
pub struct LightsPanel {
    selected: Option<NodeId>,
}

impl LightsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Draw the panel. Returns the edits the user made this frame.
    pub fn ui(&mut self, ui: &mut egui::Ui, graph: &SceneGraph) -> Vec<(NodeId, LightEdit)> {
        ui.heading("Lights");
        ui.separator();

        let lights = graph.lights();
        for (id, light) in &lights {
            let header = light.header(graph.name(*id).unwrap_or_default());
            let selected = self.selected == Some(*id);
            if ui.selectable_label(selected, egui::RichText::new(header).monospace()).clicked() {
                self.selected = if selected { None } else { Some(*id) };
            }
        }

        let Some((id, light)) = self
            .selected
            .and_then(|sel| lights.into_iter().find(|(id, _)| *id == sel))
        else {
            return Vec::new();
        };

        ui.separator();
        let mut edited = light.clone();
        light_settings(ui, &mut edited);
        light_edits(&light, &edited)
            .into_iter()
            .map(|edit| (id, edit))
            .collect()
    }
}

/// Widgets for every property the light's kind supports
fn light_settings(ui: &mut egui::Ui, light: &mut Light) {
    ui.checkbox(&mut light.enabled, "Enabled");
    color_row(ui, "Diffuse:", &mut light.diffuse);
    color_row(ui, "Specular:", &mut light.specular);
    ui.horizontal(|ui| {
        ui.label("Intensity:");
        ui.add(egui::DragValue::new(&mut light.intensity).speed(0.01).range(0.0..=10.0));
    });

    match &mut light.kind {
        LightKind::Hemispheric {
            direction,
            ground_color,
        } => {
            vector3_input(ui, "Direction:", direction);
            color_row(ui, "Ground:", ground_color);
        }
        LightKind::Directional { direction } => {
            vector3_input(ui, "Direction:", direction);
        }
        LightKind::Point { range } => {
            range_input(ui, range);
        }
        LightKind::Spot {
            direction,
            angle,
            range,
            ..
        } => {
            vector3_input(ui, "Direction:", direction);
            ui.add(egui::Slider::new(angle, 0.0..=180.0).text("Angle").suffix("\u{00b0}"));
            range_input(ui, range);
        }
    }
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Color) {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut rgb = color.to_array();
        if ui.color_edit_button_rgb(&mut rgb).changed() {
            *color = Color::new(rgb[0], rgb[1], rgb[2]);
        }
        ui.monospace(color.to_hex_string());
    });
}

/// Three drag values side by side. Returns true if any changed.
pub fn vector3_input(ui: &mut egui::Ui, label: &str, value: &mut Vec3) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);
        changed |= ui.add(egui::DragValue::new(&mut value.x).speed(0.1).prefix("x ")).changed();
        changed |= ui.add(egui::DragValue::new(&mut value.y).speed(0.1).prefix("y ")).changed();
        changed |= ui.add(egui::DragValue::new(&mut value.z).speed(0.1).prefix("z ")).changed();
    });
    changed
}

/// Range with 0 standing for unlimited
fn range_input(ui: &mut egui::Ui, range: &mut Option<f32>) {
    let mut value = range.unwrap_or(0.0);
    ui.horizontal(|ui| {
        ui.label("Range:");
        if ui.add(egui::DragValue::new(&mut value).speed(0.5).range(0.0..=1000.0)).changed() {
            *range = (value > 0.0).then_some(value);
        }
        if range.is_none() {
            ui.weak("unlimited");
        }
    });
}

/// The edits that turn `before` into `after`
pub fn light_edits(before: &Light, after: &Light) -> Vec<LightEdit> {
    let mut edits = Vec::new();
    if before.enabled != after.enabled {
        edits.push(LightEdit::Enabled(after.enabled));
    }
    if before.diffuse != after.diffuse {
        edits.push(LightEdit::Diffuse(after.diffuse));
    }
    if before.specular != after.specular {
        edits.push(LightEdit::Specular(after.specular));
    }
    if before.intensity != after.intensity {
        edits.push(LightEdit::Intensity(after.intensity));
    }
    if before.direction() != after.direction() {
        if let Some(direction) = after.direction() {
            edits.push(LightEdit::Direction(direction));
        }
    }
    if before.range() != after.range() {
        edits.push(LightEdit::Range(after.range()));
    }

    match (&before.kind, &after.kind) {
        (
            LightKind::Hemispheric { ground_color: a, .. },
            LightKind::Hemispheric { ground_color: b, .. },
        ) if a != b => edits.push(LightEdit::GroundColor(*b)),
        (LightKind::Spot { angle: a, .. }, LightKind::Spot { angle: b, .. }) if a != b => {
            edits.push(LightEdit::Angle(*b))
        }
        _ => {}
    }
    edits
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_scene::studio_scene;

    fn spot(graph: &SceneGraph) -> Light {
        graph.light(graph.node_by_name("spotLight").unwrap()).unwrap()
    }

    #[test]
    fn test_unchanged_light_has_no_edits() {
        let (graph, _) = studio_scene().unwrap();
        let light = spot(&graph);
        assert!(light_edits(&light, &light.clone()).is_empty());
    }

    #[test]
    fn test_spot_edits() {
        let (graph, _) = studio_scene().unwrap();
        let before = spot(&graph);
        let mut after = before.clone();
        after.diffuse = Color::WHITE;
        if let LightKind::Spot { angle, range, .. } = &mut after.kind {
            *angle = 45.0;
            *range = Some(30.0);
        }

        let edits = light_edits(&before, &after);
        assert_eq!(
            edits,
            vec![
                LightEdit::Diffuse(Color::WHITE),
                LightEdit::Range(Some(30.0)),
                LightEdit::Angle(45.0),
            ]
        );
    }

    #[test]
    fn test_edits_apply_through_graph() {
        let (mut graph, _) = studio_scene().unwrap();
        let env = graph.node_by_name("envLight").unwrap();
        let before = graph.light(env).unwrap();
        let mut after = before.clone();
        after.enabled = false;
        if let LightKind::Hemispheric { ground_color, direction } = &mut after.kind {
            *ground_color = Color::RED;
            *direction = Vec3::new(0.0, 1.0, 1.0);
        }

        for edit in light_edits(&before, &after) {
            graph.edit_light(env, edit).unwrap();
        }
        assert_eq!(graph.light(env).unwrap(), after);
    }
}
