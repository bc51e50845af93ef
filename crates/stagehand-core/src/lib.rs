//! Stagehand Core - Foundational types for the studio viewer
//!
//! This crate provides the types every other Stagehand crate depends on:
//! - `NodeId` - Stable scene node handles
//! - `Transform`, `Vec3`, `Color` - Spatial and color types plus matrix helpers
//! - `Light`, `LightKind`, `LightEdit` - The light model and its property edits
//! - Error types and Result alias

mod error;
mod id;
mod light;
mod types;

pub use error::{Result, StagehandError};
pub use id::NodeId;
pub use light::{Light, LightEdit, LightKind};
pub use types::{mat4_inverse, mat4_mul, mat4_transform_point, Color, Transform, Vec3, IDENTITY};
