//! Recorded pointer input, replayed through a viewport without a window

use crate::pointer::PointerButton;
use serde::{Deserialize, Serialize};
use stagehand_core::Result;
use std::path::Path;

/// One scripted input, a `[[event]]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptEvent {
    Down {
        x: f32,
        y: f32,
        #[serde(default)]
        button: PointerButton,
    },
    Move {
        x: f32,
        y: f32,
    },
    Up {
        x: f32,
        y: f32,
        #[serde(default)]
        button: PointerButton,
    },
    /// Wheel lines, positive zooms in
    Wheel { lines: f32 },
    Key { key: char },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerScript {
    /// Viewport size the coordinates refer to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<[f32; 2]>,
    #[serde(default, rename = "event")]
    pub events: Vec<ScriptEvent>,
}

impl PointerScript {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}
