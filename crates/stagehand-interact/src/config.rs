//! Layered viewer configuration
//!
//! Config is loaded with layers of precedence (highest wins):
//! 1. Environment variables: `STAGEHAND_*`
//! 2. Project-local: `.stagehand/config.toml`
//! 3. Global: `~/.stagehand/config.toml`
//! 4. Built-in defaults

use serde::{Deserialize, Serialize};
use stagehand_core::{Result, StagehandError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Stagehand".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Camera navigation limits and sensitivities. Angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Radians of orbit per pixel of pointer travel
    pub orbit_sensitivity: f32,
    /// World units of pan per pixel, per unit of orbit distance
    pub pan_sensitivity: f32,
    /// World units of zoom per wheel line
    pub zoom_sensitivity: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub fov: f32,
    pub far: f32,
    /// Camera made active on startup; the first camera when unset or unknown
    pub initial: Option<String>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.0015,
            zoom_sensitivity: 8.0,
            min_pitch: 9.0,
            max_pitch: 84.3,
            min_distance: 10.0,
            max_distance: 720.0,
            fov: 45.0,
            far: 1000.0,
            initial: Some("Camera".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotSettings {
    /// Resolution multiplier over the viewport size
    pub precision: u32,
    pub directory: PathBuf,
}

impl Default for ScreenshotSettings {
    fn default() -> Self {
        Self {
            precision: 2,
            directory: PathBuf::from("."),
        }
    }
}

/// Ambient light dimming for the overhead camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientSettings {
    pub light: String,
    pub overhead_camera: String,
    pub overhead_intensity: f32,
    pub default_intensity: f32,
}

impl Default for AmbientSettings {
    fn default() -> Self {
        Self {
            light: "envLight".to_string(),
            overhead_camera: "camera-god".to_string(),
            overhead_intensity: 0.4,
            default_intensity: 0.6,
        }
    }
}

/// Resolved viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub screenshot: ScreenshotSettings,
    pub ambient: AmbientSettings,
}

impl ViewerConfig {
    /// Load config with layered precedence: defaults < global < project < env vars
    pub fn load() -> Result<Self> {
        let mut merged = toml::Table::new();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                merge_tables(&mut merged, Self::load_table(&global_path)?);
                log::debug!("applied global config {}", global_path.display());
            }
        }

        let local_path = PathBuf::from(".stagehand/config.toml");
        if local_path.exists() {
            merge_tables(&mut merged, Self::load_table(&local_path)?);
            log::debug!("applied project config {}", local_path.display());
        }

        let mut config = Self::from_table(merged)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load config from a specific file path only
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::from_table(Self::load_table(path)?)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".stagehand").join("config.toml"))
    }

    fn load_table(path: &Path) -> Result<toml::Table> {
        let content = std::fs::read_to_string(path)?;
        content.parse::<toml::Table>().map_err(|e| {
            StagehandError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn from_table(table: toml::Table) -> Result<Self> {
        toml::Value::Table(table)
            .try_into()
            .map_err(|e| StagehandError::ConfigError(format!("Invalid config: {}", e)))
    }

    /// Apply `STAGEHAND_*` overrides read through `var`
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = var("STAGEHAND_SCREENSHOT_DIR") {
            self.screenshot.directory = PathBuf::from(dir);
        }
        if let Some(value) = var("STAGEHAND_SCREENSHOT_PRECISION") {
            self.screenshot.precision = parse_env("STAGEHAND_SCREENSHOT_PRECISION", &value)?;
        }
        if let Some(value) = var("STAGEHAND_WINDOW_WIDTH") {
            self.window.width = parse_env("STAGEHAND_WINDOW_WIDTH", &value)?;
        }
        if let Some(value) = var("STAGEHAND_WINDOW_HEIGHT") {
            self.window.height = parse_env("STAGEHAND_WINDOW_HEIGHT", &value)?;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| StagehandError::ConfigError(format!("{} has an invalid value '{}'", key, value)))
}

/// Recursively overlay `overlay` onto `base`; tables merge, everything else replaces
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.screenshot.precision, 2);
        assert_eq!(config.ambient.overhead_intensity, 0.4);
        assert_eq!(config.ambient.default_intensity, 0.6);
        assert_eq!(config.camera.min_distance, 10.0);
        assert_eq!(config.camera.max_distance, 720.0);
    }

    #[test]
    fn test_load_from_file_keeps_unset_defaults() {
        let path = std::env::temp_dir().join("stagehand_config_test.toml");
        std::fs::write(
            &path,
            "[window]\nwidth = 640\n\n[camera]\nmax_distance = 300.0\n",
        )
        .unwrap();

        let config = ViewerConfig::load_from_file(&path).unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.camera.max_distance, 300.0);
        assert_eq!(config.camera.min_distance, 10.0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_merge_tables_overlays_nested_keys() {
        let mut base: toml::Table = "[window]\nwidth = 800\nheight = 600\n".parse().unwrap();
        let overlay: toml::Table = "[window]\nheight = 400\n[screenshot]\nprecision = 4\n"
            .parse()
            .unwrap();
        merge_tables(&mut base, overlay);

        let config = ViewerConfig::from_table(base).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 400);
        assert_eq!(config.screenshot.precision, 4);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("STAGEHAND_SCREENSHOT_PRECISION", "3"),
            ("STAGEHAND_SCREENSHOT_DIR", "/tmp/shots"),
        ]
        .into_iter()
        .collect();

        let mut config = ViewerConfig::default();
        config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.screenshot.precision, 3);
        assert_eq!(config.screenshot.directory, PathBuf::from("/tmp/shots"));

        let bad = |key: &str| (key == "STAGEHAND_WINDOW_WIDTH").then(|| "wide".to_string());
        assert!(ViewerConfig::default().apply_env_overrides(bad).is_err());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let path = std::env::temp_dir().join("stagehand_config_broken.toml");
        std::fs::write(&path, "[window\n").unwrap();
        let err = ViewerConfig::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("stagehand_config_broken.toml"));
        let _ = std::fs::remove_file(&path);
    }
}
