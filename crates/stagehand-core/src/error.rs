//! Error types for Stagehand

use thiserror::Error;

/// The main error type for Stagehand operations
#[derive(Debug, Error)]
pub enum StagehandError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Duplicate node name: {0}")]
    DuplicateNodeName(String),

    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("Not a light: {0}")]
    NotALight(String),

    #[error("{kind} light has no {property} property")]
    UnsupportedLightProperty { kind: String, property: String },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Scene error: {0}")]
    SceneError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Image error: {0}")]
    ImageError(String),
}

/// Result type alias for Stagehand operations
pub type Result<T> = std::result::Result<T, StagehandError>;

impl From<toml::de::Error> for StagehandError {
    fn from(err: toml::de::Error) -> Self {
        StagehandError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for StagehandError {
    fn from(err: toml::ser::Error) -> Self {
        StagehandError::TomlSerError(err.to_string())
    }
}
