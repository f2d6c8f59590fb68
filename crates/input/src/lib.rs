//! Input: fly-camera commands and quality actions.
//!
//! # Invariants
//! - The render loop consumes commands and actions, never raw window events.
//! - Nothing here depends on a windowing library; key mapping lives in the app.

pub mod action;
pub mod command;

pub use action::Action;
pub use command::{Command, CommandSet};
