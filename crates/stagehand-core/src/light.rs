//! Studio lights and their editable properties

use crate::error::{Result, StagehandError};
use crate::types::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// A light attached to a scene node.
///
/// Properties shared by every light live on the struct; the kind-specific
/// ones live in [`LightKind`], so settings code dispatches with a `match`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub diffuse: Color,
    #[serde(default)]
    pub specular: Color,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    /// Name of a mesh whose emissive color follows `diffuse`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_mesh: Option<String>,
    #[serde(flatten)]
    pub kind: LightKind,
}

fn default_enabled() -> bool {
    true
}

fn default_intensity() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightKind {
    /// Sky/ground ambient light
    Hemispheric {
        direction: Vec3,
        #[serde(default = "default_ground_color")]
        ground_color: Color,
    },
    Directional {
        direction: Vec3,
    },
    Point {
        /// `None` means unlimited range
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<f32>,
    },
    Spot {
        direction: Vec3,
        /// Cone angle in degrees
        angle: f32,
        #[serde(default)]
        exponent: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<f32>,
    },
}

fn default_ground_color() -> Color {
    Color::BLACK
}

/// A single property change coming from the settings panel or the CLI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightEdit {
    Enabled(bool),
    Diffuse(Color),
    Specular(Color),
    Intensity(f32),
    Direction(Vec3),
    GroundColor(Color),
    /// Spot cone angle in degrees
    Angle(f32),
    /// `None` or zero means unlimited
    Range(Option<f32>),
}

impl LightEdit {
    pub fn property_name(&self) -> &'static str {
        match self {
            LightEdit::Enabled(_) => "enabled",
            LightEdit::Diffuse(_) => "diffuse",
            LightEdit::Specular(_) => "specular",
            LightEdit::Intensity(_) => "intensity",
            LightEdit::Direction(_) => "direction",
            LightEdit::GroundColor(_) => "ground color",
            LightEdit::Angle(_) => "angle",
            LightEdit::Range(_) => "range",
        }
    }
}

pub const MAX_SPOT_ANGLE: f32 = 180.0;

impl Light {
    pub fn new(kind: LightKind) -> Self {
        Self {
            enabled: true,
            diffuse: Color::WHITE,
            specular: Color::WHITE,
            intensity: 1.0,
            linked_mesh: None,
            kind,
        }
    }

    pub fn with_diffuse(mut self, diffuse: Color) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_linked_mesh(mut self, mesh: impl Into<String>) -> Self {
        self.linked_mesh = Some(mesh.into());
        self
    }

    /// Display name of the light kind, e.g. `"Spot"`
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            LightKind::Hemispheric { .. } => "Hemispheric",
            LightKind::Directional { .. } => "Directional",
            LightKind::Point { .. } => "Point",
            LightKind::Spot { .. } => "Spot",
        }
    }

    /// Header used by the lights list, e.g. `"SpotLight  spotLight"`
    pub fn header(&self, name: &str) -> String {
        format!("{}Light  {}", self.kind_name(), name)
    }

    pub fn direction(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Hemispheric { direction, .. }
            | LightKind::Directional { direction }
            | LightKind::Spot { direction, .. } => Some(direction),
            LightKind::Point { .. } => None,
        }
    }

    pub fn range(&self) -> Option<f32> {
        match self.kind {
            LightKind::Point { range } | LightKind::Spot { range, .. } => range,
            _ => None,
        }
    }

    /// Apply an edit. Fails when this kind of light has no such property or
    /// the value is out of range; the light is unchanged on failure.
    pub fn apply(&mut self, edit: LightEdit) -> Result<()> {
        let unsupported = StagehandError::UnsupportedLightProperty {
            kind: self.kind_name().to_string(),
            property: edit.property_name().to_string(),
        };

        match edit {
            LightEdit::Enabled(enabled) => self.enabled = enabled,
            LightEdit::Diffuse(color) => self.diffuse = color,
            LightEdit::Specular(color) => self.specular = color,
            LightEdit::Intensity(value) => {
                if !(value >= 0.0) {
                    return Err(StagehandError::ValueOutOfRange {
                        field: "intensity".to_string(),
                        min: 0.0,
                        max: f64::INFINITY,
                        value: value as f64,
                    });
                }
                self.intensity = value;
            }
            LightEdit::Direction(new_dir) => match &mut self.kind {
                LightKind::Hemispheric { direction, .. }
                | LightKind::Directional { direction }
                | LightKind::Spot { direction, .. } => *direction = new_dir,
                LightKind::Point { .. } => return Err(unsupported),
            },
            LightEdit::GroundColor(color) => match &mut self.kind {
                LightKind::Hemispheric { ground_color, .. } => *ground_color = color,
                _ => return Err(unsupported),
            },
            LightEdit::Angle(degrees) => {
                if !(0.0..=MAX_SPOT_ANGLE).contains(&degrees) {
                    return Err(StagehandError::ValueOutOfRange {
                        field: "angle".to_string(),
                        min: 0.0,
                        max: MAX_SPOT_ANGLE as f64,
                        value: degrees as f64,
                    });
                }
                match &mut self.kind {
                    LightKind::Spot { angle, .. } => *angle = degrees,
                    _ => return Err(unsupported),
                }
            }
            LightEdit::Range(value) => {
                let value = match value {
                    Some(r) if r < 0.0 => {
                        return Err(StagehandError::ValueOutOfRange {
                            field: "range".to_string(),
                            min: 0.0,
                            max: f64::INFINITY,
                            value: r as f64,
                        })
                    }
                    Some(r) if r == 0.0 => None,
                    other => other,
                };
                match &mut self.kind {
                    LightKind::Point { range } | LightKind::Spot { range, .. } => *range = value,
                    _ => return Err(unsupported),
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot() -> Light {
        Light::new(LightKind::Spot {
            direction: Vec3::new(0.0, -2.0, 0.0),
            angle: 90.0,
            exponent: 10.0,
            range: None,
        })
    }

    #[test]
    fn test_header() {
        assert_eq!(spot().header("spotLight"), "SpotLight  spotLight");
        let point = Light::new(LightKind::Point { range: None });
        assert_eq!(point.header("pointLight"), "PointLight  pointLight");
    }

    #[test]
    fn test_angle_edit() {
        let mut light = spot();
        light.apply(LightEdit::Angle(45.0)).unwrap();
        assert!(matches!(light.kind, LightKind::Spot { angle, .. } if angle == 45.0));

        assert!(light.apply(LightEdit::Angle(181.0)).is_err());
        assert!(matches!(light.kind, LightKind::Spot { angle, .. } if angle == 45.0));
    }

    #[test]
    fn test_unsupported_property() {
        let mut point = Light::new(LightKind::Point { range: Some(5.0) });
        let err = point.apply(LightEdit::Angle(30.0)).unwrap_err();
        assert!(matches!(err, StagehandError::UnsupportedLightProperty { .. }));
        assert!(point.apply(LightEdit::Direction(Vec3::UP)).is_err());

        let mut hemi = Light::new(LightKind::Hemispheric {
            direction: Vec3::UP,
            ground_color: Color::BLACK,
        });
        assert!(hemi.apply(LightEdit::Range(Some(3.0))).is_err());
        hemi.apply(LightEdit::GroundColor(Color::RED)).unwrap();
    }

    #[test]
    fn test_zero_range_means_unlimited() {
        let mut point = Light::new(LightKind::Point { range: Some(5.0) });
        point.apply(LightEdit::Range(Some(0.0))).unwrap();
        assert_eq!(point.range(), None);
        point.apply(LightEdit::Range(Some(12.0))).unwrap();
        assert_eq!(point.range(), Some(12.0));
        assert!(point.apply(LightEdit::Range(Some(-1.0))).is_err());
    }

    #[test]
    fn test_negative_intensity_rejected() {
        let mut light = spot();
        assert!(light.apply(LightEdit::Intensity(-0.5)).is_err());
        light.apply(LightEdit::Intensity(2.4)).unwrap();
        assert_eq!(light.intensity, 2.4);
    }

    #[test]
    fn test_toml_shape() {
        let text = r##"
            kind = "spot"
            diffuse = "#ff0000"
            intensity = 2.4
            direction = [0.0, -2.0, 0.0]
            angle = 90.0
            exponent = 10.0
        "##;
        let light: Light = toml::from_str(text).unwrap();
        assert!(light.enabled);
        assert_eq!(light.diffuse, Color::RED);
        assert_eq!(light.kind_name(), "Spot");
        assert_eq!(light.range(), None);

        let out = toml::to_string(&light).unwrap();
        assert!(out.contains("kind = \"spot\""));
        assert!(out.contains("diffuse = \"#ff0000\""));
    }
}
