//! GUI panels for the viewer

mod lights;
mod operations;

pub use lights::{light_edits, vector3_input, LightsPanel};
pub use operations::{operations_panel, OperationAction, OperationsView};
