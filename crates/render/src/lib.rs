//! Rendering adapter: renderer-agnostic frame interface.
//!
//! # Invariants
//! - Renderers never mutate loop state; they consume a finished frame.
//! - Scaled targets are never smaller than 1x1.

mod renderer;

pub use renderer::{DebugTextRenderer, Extent, FrameUniforms, Renderer, scaled_extent};
