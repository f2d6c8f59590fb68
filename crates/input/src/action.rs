use crate::command::Command;

/// A discrete event for the render loop, produced by whatever input layer is
/// in front of it (window keys, a scripted test, the CLI simulator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// A fly-camera command became active.
    Press(Command),
    /// A fly-camera command became inactive.
    Release(Command),
    /// Raise the render scale by the configured quality step.
    IncreaseQuality,
    /// Lower the render scale by the configured quality step.
    DecreaseQuality,
    /// Restore the default scale and re-run warm-up auto-tuning.
    ResetQuality,
    /// The output surface changed size; re-run warm-up auto-tuning.
    Resized { width: u32, height: u32 },
}

impl Action {
    /// Press or release depending on key state.
    pub fn key(command: Command, pressed: bool) -> Self {
        if pressed {
            Action::Press(command)
        } else {
            Action::Release(command)
        }
    }

    /// True for actions that re-arm the warm-up window.
    pub fn resets_quality(&self) -> bool {
        matches!(self, Action::ResetQuality | Action::Resized { .. })
    }
}
