//! Paints a wireframe [`Frame`] onto an egui layer

use stagehand_interact::Frame;

/// Frame coordinates are physical pixels; egui works in points
pub fn paint_frame(painter: &egui::Painter, frame: &Frame, pixels_per_point: f32) {
    let scale = 1.0 / pixels_per_point.max(f32::EPSILON);
    for segment in &frame.segments {
        let [r, g, b] = segment.color;
        painter.line_segment(
            [
                egui::pos2(segment.from[0] * scale, segment.from[1] * scale),
                egui::pos2(segment.to[0] * scale, segment.to[1] * scale),
            ],
            egui::Stroke::new(segment.width, egui::Color32::from_rgb(r, g, b)),
        );
    }
}

/// Clear color for a frame background given in sRGB bytes
pub fn clear_color(rgb: [u8; 3]) -> wgpu::Color {
    let linear = |c: u8| ((c as f64) / 255.0).powf(2.2);
    wgpu::Color {
        r: linear(rgb[0]),
        g: linear(rgb[1]),
        b: linear(rgb[2]),
        a: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_color_is_linear() {
        let color = clear_color([255, 0, 128]);
        assert!((color.r - 1.0).abs() < 1e-9);
        assert_eq!(color.g, 0.0);
        assert!(color.b > 0.2 && color.b < 0.25);
    }
}
