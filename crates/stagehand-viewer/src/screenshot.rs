//! Screenshots: the viewport's wireframe rasterized into a PNG
//!
//! The image is drawn from the same [`Frame`] the window paints, at
//! `precision` times the viewport size, so it needs no GPU readback.

use image::{Rgb, RgbImage};
use stagehand_core::{Result, StagehandError};
use stagehand_interact::config::ScreenshotSettings;
use stagehand_interact::frame::{Frame, BACKGROUND};
use stagehand_interact::{NavigationInput, Viewport};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// `screenshot-<unix-ms>.png`
pub fn file_name(unix_ms: u128) -> String {
    format!("screenshot-{}.png", unix_ms)
}

/// Capture the viewport into the configured directory. Returns the file written.
pub fn capture<C: NavigationInput>(viewport: &Viewport<C>, settings: &ScreenshotSettings) -> Result<PathBuf> {
    let precision = settings.precision.max(1);
    let [w, h] = viewport.size();
    let frame = viewport.frame_at([w * precision as f32, h * precision as f32]);

    let unix_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    std::fs::create_dir_all(&settings.directory)?;
    let path = settings.directory.join(file_name(unix_ms));

    save_png(&frame, precision as f32, &path)?;
    log::info!("screenshot saved to {}", path.display());
    Ok(path)
}

/// Rasterize `frame` and write it as a PNG. Line widths are multiplied by
/// `line_scale` so thick lines stay thick at higher precision.
pub fn save_png(frame: &Frame, line_scale: f32, path: &Path) -> Result<()> {
    rasterize(frame, line_scale)
        .save(path)
        .map_err(|e| StagehandError::ImageError(format!("{}: {}", path.display(), e)))
}

pub fn rasterize(frame: &Frame, line_scale: f32) -> RgbImage {
    let width = frame.size[0].round().max(1.0) as u32;
    let height = frame.size[1].round().max(1.0) as u32;
    let mut image = RgbImage::from_pixel(width, height, Rgb(BACKGROUND));

    for segment in &frame.segments {
        let thickness = (segment.width * line_scale).max(1.0);
        draw_line(&mut image, segment.from, segment.to, thickness, Rgb(segment.color));
    }
    image
}

fn draw_line(image: &mut RgbImage, from: [f32; 2], to: [f32; 2], thickness: f32, color: Rgb<u8>) {
    let (dx, dy) = (to[0] - from[0], to[1] - from[1]);
    let steps = (dx.abs().max(dy.abs()) * 2.0).ceil().max(1.0) as u32;
    let radius = ((thickness - 1.0) / 2.0).max(0.0);

    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        stamp(image, from[0] + dx * t, from[1] + dy * t, radius, color);
    }
}

fn stamp(image: &mut RgbImage, x: f32, y: f32, radius: f32, color: Rgb<u8>) {
    let (w, h) = (image.width() as i64, image.height() as i64);
    let x0 = (x - radius).floor() as i64;
    let x1 = (x + radius).floor() as i64;
    let y0 = (y - radius).floor() as i64;
    let y1 = (y + radius).floor() as i64;
    if x1 < 0 || y1 < 0 || x0 >= w || y0 >= h {
        return;
    }
    for py in y0.max(0)..=y1.min(h - 1) {
        for px in x0.max(0)..=x1.min(w - 1) {
            image.put_pixel(px as u32, py as u32, color);
        }
    }
}
