//! Pointer events as the viewport hands them to the drag controller

use crate::picking::PickHit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// One pointer event in viewport pixels.
///
/// `pick` is the scene pick under the pointer at dispatch time, restricted
/// to pickable nodes. It is only computed for `Down`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub button: PointerButton,
    pub x: f32,
    pub y: f32,
    pub pick: Option<PickHit>,
}

impl PointerEvent {
    pub fn down(button: PointerButton, x: f32, y: f32, pick: Option<PickHit>) -> Self {
        Self {
            kind: PointerKind::Down,
            button,
            x,
            y,
            pick,
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Move,
            button: PointerButton::Primary,
            x,
            y,
            pick: None,
        }
    }

    pub fn up(button: PointerButton, x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Up,
            button,
            x,
            y,
            pick: None,
        }
    }
}
