use std::time::Duration;

use flythrough_camera::CameraState;
use flythrough_common::{CameraVectors, SceneConstants};
use flythrough_input::{Action, CommandSet};
use flythrough_pacing::{FrameScheduler, Phase};

use crate::config::FlightConfig;

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub scale: f32,
    pub dt: Duration,
    pub elapsed: Duration,
    pub phase: Phase,
    pub camera: CameraVectors,
}

impl FrameOutput {
    pub fn dt_secs(&self) -> f32 {
        self.dt.as_secs_f32()
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

/// The render loop's state, owned by whoever drives the loop.
///
/// Built once at startup and threaded through every tick. Any scheduling
/// harness can drive it: the desktop event loop, the CLI simulator, or a
/// test feeding synthetic timestamps.
#[derive(Debug, Clone)]
pub struct FlightLoop {
    scheduler: FrameScheduler,
    camera: CameraState,
    held: CommandSet,
    scene: SceneConstants,
    quality_step: f32,
    frames: u64,
}

impl FlightLoop {
    pub fn new(config: FlightConfig) -> Self {
        Self {
            scheduler: FrameScheduler::new(config.scheduler),
            camera: CameraState::new(config.camera),
            held: CommandSet::empty(),
            scene: config.scene,
            quality_step: config.quality_step,
            frames: 0,
        }
    }

    /// Run one frame at `timestamp`.
    pub fn tick(&mut self, timestamp: Duration) -> FrameOutput {
        let _span = tracing::info_span!("flight_tick").entered();

        let timing = self.scheduler.tick(timestamp);
        // Same dt for both halves of the frame.
        self.camera.update(timing.dt_secs(), &self.held);
        self.frames += 1;

        let output = FrameOutput {
            scale: timing.scale,
            dt: timing.dt,
            elapsed: timing.elapsed,
            phase: timing.phase,
            camera: self.camera.derive_vectors(),
        };
        tracing::trace!(
            frame = self.frames,
            scale = output.scale,
            dt_ms = output.dt.as_secs_f64() * 1000.0,
            "frame ticked"
        );
        output
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Press(command) => self.held.insert(command),
            Action::Release(command) => self.held.remove(command),
            Action::IncreaseQuality => {
                self.scheduler.adjust_scale(self.quality_step);
            }
            Action::DecreaseQuality => {
                self.scheduler.adjust_scale(-self.quality_step);
            }
            Action::ResetQuality => self.scheduler.reset(),
            Action::Resized { width, height } => {
                tracing::debug!(width, height, "output resized");
                self.scheduler.reset();
            }
        }
    }

    /// Drop every held command, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn scale(&self) -> f32 {
        self.scheduler.scale()
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn held(&self) -> CommandSet {
        self.held
    }

    pub fn scene(&self) -> &SceneConstants {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneConstants {
        &mut self.scene
    }

    /// Frames ticked since construction.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl Default for FlightLoop {
    fn default() -> Self {
        Self::new(FlightConfig::default())
    }
}
