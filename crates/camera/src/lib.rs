//! Fly camera: integrates held commands into a position and a unit quaternion.
//!
//! # Invariants
//! - Orientation is renormalized after every update.
//! - Forward and up are derived from orientation on demand, never stored.
//! - A zero time step leaves the pose untouched.

mod camera;

pub use camera::{CameraConfig, CameraState};
