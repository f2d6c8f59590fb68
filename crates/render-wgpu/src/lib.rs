//! wgpu render backend for the flythrough renderer.
//!
//! Draws a single full-screen shader into an offscreen target sized by the
//! current render scale, then upscales it onto the window surface.
//!
//! # Invariants
//! - The renderer never mutates loop state; it only consumes `FrameUniforms`.
//! - The offscreen target always matches the frame's scaled extent.

mod gpu;
mod shaders;

pub use gpu::ShaderRenderer;
