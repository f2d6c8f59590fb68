//! Developer tooling: frame statistics for overlays and logs.
//!
//! # Invariants
//! - Tools only read loop state.

mod inspector;

pub use inspector::{FrameInspector, FrameSummary};
