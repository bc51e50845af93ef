//! Stagehand Viewer - egui studio viewer
//!
//! Paints the viewport's wireframe over a wgpu surface, feeds window input
//! into the [`Viewport`](stagehand_interact::Viewport), and hosts the
//! light settings and operation panels.

pub mod app;
pub mod context;
pub mod overlay;
pub mod panels;
pub mod screenshot;

pub use app::run;
pub use context::RenderContext;
