use flythrough_kernel::FlightLoop;
use flythrough_pacing::{FrameTimer, Phase};
use glam::Vec3;

/// Read-only view over the render loop for stats overlays.
pub struct FrameInspector;

impl FrameInspector {
    /// Summarize recent frame times together with the loop's current state.
    pub fn summary(flight: &FlightLoop, timer: &FrameTimer) -> FrameSummary {
        let ms = |d: std::time::Duration| d.as_secs_f32() * 1000.0;
        FrameSummary {
            frames: flight.frame_count(),
            fps: timer.fps(),
            avg_ms: ms(timer.average()),
            min_ms: ms(timer.min()),
            max_ms: ms(timer.max()),
            scale: flight.scale(),
            phase: flight.scheduler().phase(),
            position: flight.camera().position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub frames: u64,
    pub fps: f32,
    pub avg_ms: f32,
    pub min_ms: f32,
    pub max_ms: f32,
    pub scale: f32,
    pub phase: Phase,
    pub position: Vec3,
}

impl std::fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.0} fps ({:.1} ms, {:.1}-{:.1}) scale={:.2} [{}] frames={} pos=({:.1}, {:.1}, {:.1})",
            self.fps,
            self.avg_ms,
            self.min_ms,
            self.max_ms,
            self.scale,
            self.phase,
            self.frames,
            self.position.x,
            self.position.y,
            self.position.z,
        )
    }
}
