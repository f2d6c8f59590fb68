//! Shared types and math for the flythrough renderer.
//!
//! # Invariants
//! - Camera vectors handed to renderers are unit length.
//! - Quaternions leaving [`renormalize`] are unit length or identity.

pub mod math;
pub mod types;

pub use math::{LOCAL_FORWARD, LOCAL_RIGHT, LOCAL_UP, renormalize, rotate_unit};
pub use types::{CameraVectors, SceneConstants};
