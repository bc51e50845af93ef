//! Stagehand Interact - everything between window input and the scene graph
//!
//! Cameras and their navigation controls, ray picking, the drag controller
//! that moves meshes across the ground, gizmo selection, and the
//! [`Viewport`] that ties them into one interactive session. Nothing here
//! touches the GPU; the viewer paints the [`Frame`] this crate produces.

pub mod camera;
pub mod config;
pub mod control;
pub mod deferred;
pub mod drag;
pub mod frame;
pub mod picking;
pub mod pointer;
pub mod projection;
pub mod script;
pub mod selection;
pub mod viewport;

pub use camera::{Camera, CameraMode, CameraRig, CameraRigs};
pub use config::ViewerConfig;
pub use control::{CameraControl, OrbitControls};
pub use drag::{DragController, DragOutcome, DragSession, DragState};
pub use frame::{Frame, Segment};
pub use picking::{PickHit, PickService, ScenePicker};
pub use pointer::{PointerButton, PointerEvent, PointerKind};
pub use script::{PointerScript, ScriptEvent};
pub use selection::GizmoSelection;
pub use viewport::{NavigationInput, Viewport};
