//! Frame pacing: adaptive resolution scaling and frame time tracking.
//!
//! # Invariants
//! - `scale` stays within `[min_scale, max_scale]` and `min_scale > 0`.
//! - Auto-tuning only ever lowers the scale, and only during warm-up.
//! - The scheduler is a pure state machine over caller-supplied timestamps;
//!   it never reads a clock itself.

mod scheduler;
mod timer;

pub use scheduler::{FrameScheduler, FrameTiming, Phase, SchedulerConfig};
pub use timer::FrameTimer;
