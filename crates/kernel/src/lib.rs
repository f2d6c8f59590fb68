//! Flight kernel: the explicit per-tick context driving scale and camera.
//!
//! # Invariants
//! - One `FlightLoop` owns all loop state; there are no globals.
//! - Each tick runs the scheduler before the camera, and both see the same dt.
//! - Actions only take effect through `FlightLoop::apply`.

pub mod config;
pub mod flight;

pub use config::{ConfigError, FlightConfig};
pub use flight::{FlightLoop, FrameOutput};
