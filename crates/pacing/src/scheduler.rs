use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Adaptive resolution configuration.
///
/// Durations are written to config files as (fractional) milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Scale restored on construction and on every reset.
    pub default_scale: f32,
    /// Lower clamp for the scale. Must be strictly positive.
    pub min_scale: f32,
    pub max_scale: f32,
    /// Amount the scale drops for each over-budget frame during warm-up.
    pub step_down: f32,
    /// Frames slower than this count as over budget.
    #[serde(rename = "frame_budget_ms", with = "millis")]
    pub frame_budget: Duration,
    /// Auto-tuning window measured from the first tick after a reset.
    #[serde(rename = "warmup_ms", with = "millis")]
    pub warmup: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_scale: 1.0,
            min_scale: 0.1,
            max_scale: 1.0,
            step_down: 0.01,
            frame_budget: Duration::from_millis(30),
            warmup: Duration::from_millis(5000),
        }
    }
}

/// Whether the auto-tuner is still allowed to lower the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Inside the warm-up window; over-budget frames lower the scale.
    Warming,
    /// Warm-up is over; only manual adjustment changes the scale.
    Settled,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Warming => f.write_str("warming"),
            Phase::Settled => f.write_str("settled"),
        }
    }
}

/// Result of a single scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Time since the previous tick. Zero on the first tick after a reset.
    pub dt: Duration,
    /// Time since the first tick after the last reset.
    pub elapsed: Duration,
    pub scale: f32,
    pub phase: Phase,
}

impl FrameTiming {
    pub fn dt_secs(&self) -> f32 {
        self.dt.as_secs_f32()
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

/// Adaptive-quality frame scheduler.
///
/// Tracks inter-frame time from a stream of monotonic timestamps and lowers
/// the render scale while frames run over budget during the warm-up window.
/// The scale is never raised automatically; recovery is manual through
/// [`FrameScheduler::adjust_scale`] or a reset.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    config: SchedulerConfig,
    scale: f32,
    start: Option<Duration>,
    last: Duration,
    elapsed: Duration,
    phase: Phase,
}

impl FrameScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let mut scheduler = Self {
            scale: config.default_scale,
            config,
            start: None,
            last: Duration::ZERO,
            elapsed: Duration::ZERO,
            phase: Phase::Warming,
        };
        scheduler.scale = scheduler.clamp(scheduler.scale);
        scheduler
    }

    /// Advance to `timestamp` and run the auto-tune policy.
    ///
    /// Timestamps earlier than the previous one produce a zero delta and do
    /// not move the scheduler's clock backwards.
    pub fn tick(&mut self, timestamp: Duration) -> FrameTiming {
        let Some(start) = self.start else {
            self.start = Some(timestamp);
            self.last = timestamp;
            self.elapsed = Duration::ZERO;
            self.phase = self.phase_for(Duration::ZERO);
            return self.timing(Duration::ZERO);
        };

        let dt = timestamp.saturating_sub(self.last);
        self.last = self.last.max(timestamp);
        self.elapsed = self.last.saturating_sub(start);

        match self.phase_for(self.elapsed) {
            Phase::Warming => {
                if dt > self.config.frame_budget {
                    let lowered = self.clamp(self.scale - self.config.step_down);
                    if lowered < self.scale {
                        tracing::debug!(
                            dt_ms = dt.as_secs_f64() * 1000.0,
                            scale = lowered,
                            "frame over budget, lowering render scale"
                        );
                    }
                    self.scale = lowered;
                }
                self.phase = Phase::Warming;
            }
            Phase::Settled => {
                if self.phase == Phase::Warming {
                    tracing::info!(scale = self.scale, "render scale settled");
                }
                self.phase = Phase::Settled;
            }
        }

        self.timing(dt)
    }

    /// Restore the configured default scale and re-arm the warm-up window.
    pub fn reset(&mut self) {
        self.reset_to(self.config.default_scale);
    }

    /// Like [`FrameScheduler::reset`], restoring `scale` instead of the configured default.
    pub fn reset_to(&mut self, scale: f32) {
        self.start = None;
        self.elapsed = Duration::ZERO;
        self.phase = Phase::Warming;
        if scale.is_finite() {
            self.scale = self.clamp(scale);
        }
        tracing::info!(scale = self.scale, "render scale reset, warm-up re-armed");
    }

    /// Manually nudge the scale by `delta`. Works in either phase.
    /// Returns the new scale.
    pub fn adjust_scale(&mut self, delta: f32) -> f32 {
        if delta.is_finite() {
            self.scale = self.clamp(self.scale + delta);
            tracing::debug!(delta, scale = self.scale, "render scale adjusted");
        }
        self.scale
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time since the first tick after the last reset.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// True until the first tick after construction or a reset.
    pub fn awaiting_first_tick(&self) -> bool {
        self.start.is_none()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn phase_for(&self, elapsed: Duration) -> Phase {
        if elapsed < self.config.warmup {
            Phase::Warming
        } else {
            Phase::Settled
        }
    }

    fn clamp(&self, scale: f32) -> f32 {
        scale.max(self.config.min_scale).min(self.config.max_scale)
    }

    fn timing(&self, dt: Duration) -> FrameTiming {
        FrameTiming {
            dt,
            elapsed: self.elapsed,
            scale: self.scale,
            phase: self.phase,
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

/// Serde adapter storing a `Duration` as fractional milliseconds.
mod millis {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_nanos() as f64 / 1e6)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = f64::deserialize(deserializer)?;
        if !ms.is_finite() || ms < 0.0 {
            return Err(D::Error::custom(format!(
                "expected a non-negative number of milliseconds, got {ms}"
            )));
        }
        Ok(Duration::from_nanos((ms * 1e6).round() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn drive(scheduler: &mut FrameScheduler, stamps: &[u64]) -> Vec<FrameTiming> {
        stamps.iter().map(|&t| scheduler.tick(ms(t))).collect()
    }

    #[test]
    fn config_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.default_scale, 1.0);
        assert_eq!(config.max_scale, 1.0);
        assert!(config.min_scale > 0.0);
        assert_eq!(config.step_down, 0.01);
        assert_eq!(config.frame_budget, ms(30));
        assert_eq!(config.warmup, ms(5000));
    }

    #[test]
    fn first_tick_has_zero_dt() {
        let mut scheduler = FrameScheduler::default();
        assert!(scheduler.awaiting_first_tick());
        let t = scheduler.tick(ms(1234));
        assert_eq!(t.dt, Duration::ZERO);
        assert_eq!(t.elapsed, Duration::ZERO);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.phase, Phase::Warming);
        assert!(!scheduler.awaiting_first_tick());
    }

    #[test]
    fn subsequent_ticks_measure_delta_and_elapsed() {
        let mut scheduler = FrameScheduler::default();
        let timings = drive(&mut scheduler, &[100, 116, 150]);
        assert_eq!(timings[1].dt, ms(16));
        assert_eq!(timings[2].dt, ms(34));
        assert_eq!(timings[2].elapsed, ms(50));
        assert!((timings[1].dt_secs() - 0.016).abs() < 1e-6);
    }

    #[test]
    fn three_slow_frames_lower_scale_by_three_steps() {
        let mut scheduler = FrameScheduler::default();
        let timings = drive(&mut scheduler, &[0, 40, 80, 120]);
        let last = timings.last().unwrap();
        assert!((last.scale - 0.97).abs() < 1e-6, "scale was {}", last.scale);
        assert_eq!(last.phase, Phase::Warming);
    }

    #[test]
    fn frames_within_budget_keep_scale() {
        let mut scheduler = FrameScheduler::default();
        drive(&mut scheduler, &[0, 16, 33, 50, 80]);
        assert_eq!(scheduler.scale(), 1.0);
    }

    #[test]
    fn exactly_on_budget_is_not_over() {
        let mut scheduler = FrameScheduler::default();
        drive(&mut scheduler, &[0, 30, 60]);
        assert_eq!(scheduler.scale(), 1.0);
    }

    #[test]
    fn auto_tune_never_raises_scale() {
        let mut scheduler = FrameScheduler::default();
        let stamps: Vec<u64> = (0..200u64)
            .scan(0u64, |t, i| {
                *t += if i % 3 == 0 { 10 } else { 45 };
                Some(*t)
            })
            .collect();
        let mut previous = scheduler.scale();
        for t in stamps {
            let timing = scheduler.tick(ms(t));
            assert!(timing.scale <= previous);
            previous = timing.scale;
        }
        assert!(previous < 1.0);
    }

    #[test]
    fn auto_tune_stops_at_min_scale() {
        let mut scheduler = FrameScheduler::default();
        for i in 0..120 {
            scheduler.tick(ms(i * 40));
        }
        assert_eq!(scheduler.scale(), scheduler.config().min_scale);
        assert!(scheduler.scale() > 0.0);
    }

    #[test]
    fn scale_frozen_after_warmup() {
        let mut scheduler = FrameScheduler::default();
        scheduler.tick(ms(0));
        scheduler.tick(ms(40));
        let settled = scheduler.tick(ms(5000));
        assert_eq!(settled.phase, Phase::Settled);
        // The 4960 ms frame lands exactly on the warm-up end and is not counted.
        assert!((settled.scale - 0.99).abs() < 1e-6);
        let frozen = scheduler.scale();

        for t in [5100, 5300, 6000] {
            let timing = scheduler.tick(ms(t));
            assert_eq!(timing.scale, frozen);
            assert_eq!(timing.phase, Phase::Settled);
        }

        let adjusted = scheduler.adjust_scale(-0.05);
        assert!((adjusted - (frozen - 0.05)).abs() < 1e-6);
    }

    #[test]
    fn slow_frame_just_inside_warmup_still_steps() {
        let mut scheduler = FrameScheduler::default();
        scheduler.tick(ms(0));
        scheduler.tick(ms(40));
        let inside = scheduler.tick(ms(4999));
        assert_eq!(inside.phase, Phase::Warming);
        assert!((inside.scale - 0.98).abs() < 1e-6);

        let boundary = scheduler.tick(ms(5000));
        assert_eq!(boundary.phase, Phase::Settled);
        assert_eq!(boundary.scale, inside.scale);
    }

    #[test]
    fn tick_crossing_warmup_does_not_step() {
        let mut scheduler = FrameScheduler::default();
        scheduler.tick(ms(0));
        let t = scheduler.tick(ms(6000));
        assert_eq!(t.phase, Phase::Settled);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn reset_restores_default_and_rearms_warmup() {
        let mut scheduler = FrameScheduler::default();
        drive(&mut scheduler, &[0, 50, 100, 6000]);
        assert_eq!(scheduler.phase(), Phase::Settled);
        assert!(scheduler.scale() < 1.0);

        scheduler.reset();
        assert_eq!(scheduler.scale(), 1.0);
        assert_eq!(scheduler.phase(), Phase::Warming);
        assert!(scheduler.awaiting_first_tick());

        let first = scheduler.tick(ms(9000));
        assert_eq!(first.dt, Duration::ZERO);
        assert_eq!(first.elapsed, Duration::ZERO);

        let slow = scheduler.tick(ms(9100));
        assert_eq!(slow.phase, Phase::Warming);
        assert!((slow.scale - 0.99).abs() < 1e-6);
    }

    #[test]
    fn reset_to_clamps_supplied_scale() {
        let mut scheduler = FrameScheduler::default();
        scheduler.reset_to(0.5);
        assert_eq!(scheduler.scale(), 0.5);
        scheduler.reset_to(3.0);
        assert_eq!(scheduler.scale(), 1.0);
        scheduler.reset_to(-1.0);
        assert_eq!(scheduler.scale(), scheduler.config().min_scale);
        scheduler.reset_to(f32::NAN);
        assert_eq!(scheduler.scale(), scheduler.config().min_scale);
    }

    #[test]
    fn adjust_scale_stays_in_bounds() {
        let mut scheduler = FrameScheduler::default();
        let min = scheduler.config().min_scale;
        for _ in 0..100 {
            let s = scheduler.adjust_scale(-0.05);
            assert!(s >= min && s > 0.0);
        }
        assert_eq!(scheduler.scale(), min);
        for _ in 0..100 {
            let s = scheduler.adjust_scale(0.05);
            assert!(s <= 1.0);
        }
        assert_eq!(scheduler.scale(), 1.0);
        assert_eq!(scheduler.adjust_scale(1e9), 1.0);
        assert_eq!(scheduler.adjust_scale(-1e9), min);
        assert_eq!(scheduler.adjust_scale(f32::INFINITY), min);
    }

    #[test]
    fn adjust_scale_during_warmup_keeps_phase() {
        let mut scheduler = FrameScheduler::default();
        scheduler.tick(ms(0));
        scheduler.adjust_scale(-0.2);
        let t = scheduler.tick(ms(10));
        assert_eq!(t.phase, Phase::Warming);
        assert!((t.scale - 0.8).abs() < 1e-6);
    }

    #[test]
    fn backwards_timestamp_yields_zero_delta() {
        let mut scheduler = FrameScheduler::default();
        drive(&mut scheduler, &[100, 200]);
        let t = scheduler.tick(ms(150));
        assert_eq!(t.dt, Duration::ZERO);
        assert_eq!(t.elapsed, ms(100));
        let next = scheduler.tick(ms(210));
        assert_eq!(next.dt, ms(10));
    }

    #[test]
    fn default_scale_outside_range_is_clamped() {
        let scheduler = FrameScheduler::new(SchedulerConfig {
            default_scale: 2.0,
            ..SchedulerConfig::default()
        });
        assert_eq!(scheduler.scale(), 1.0);
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Warming.to_string(), "warming");
        assert_eq!(Phase::Settled.to_string(), "settled");
    }
}
