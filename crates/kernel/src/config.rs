//! Loop configuration, loadable from YAML or JSON.
//!
//! Every section is optional in the file; missing fields take their defaults.

use std::path::Path;

use flythrough_camera::CameraConfig;
use flythrough_common::SceneConstants;
use flythrough_pacing::SchedulerConfig;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a [`FlightConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Everything needed to build a [`crate::FlightLoop`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub scheduler: SchedulerConfig,
    pub camera: CameraConfig,
    pub scene: SceneConstants,
    /// Scale change per quality hotkey press.
    pub quality_step: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            camera: CameraConfig::default(),
            scene: SceneConstants::default(),
            quality_step: 0.05,
        }
    }
}

impl FlightConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let parse: fn(&str) -> Result<Self, ConfigError> = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str,
            "json" => Self::from_json_str,
            _ => return Err(ConfigError::UnsupportedFormat(ext)),
        };
        let config = parse(&std::fs::read_to_string(path)?)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject settings that would break the scale or camera invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scheduler;
        if !(s.min_scale.is_finite() && s.min_scale > 0.0) {
            return Err(invalid("scheduler.min_scale", "must be finite and > 0"));
        }
        if !(s.max_scale.is_finite() && s.max_scale >= s.min_scale) {
            return Err(invalid("scheduler.max_scale", "must be finite and >= min_scale"));
        }
        if !(s.default_scale >= s.min_scale && s.default_scale <= s.max_scale) {
            return Err(invalid(
                "scheduler.default_scale",
                format!("must lie in [{}, {}]", s.min_scale, s.max_scale),
            ));
        }
        if !(s.step_down.is_finite() && s.step_down >= 0.0) {
            return Err(invalid("scheduler.step_down", "must be finite and >= 0"));
        }
        if s.frame_budget.is_zero() {
            return Err(invalid("scheduler.frame_budget_ms", "must be > 0"));
        }
        if !(self.quality_step.is_finite() && self.quality_step > 0.0) {
            return Err(invalid("quality_step", "must be finite and > 0"));
        }
        let c = &self.camera;
        if !(c.movement_speed.is_finite() && c.movement_speed >= 0.0) {
            return Err(invalid("camera.movement_speed", "must be finite and >= 0"));
        }
        if !(c.roll_speed.is_finite() && c.roll_speed >= 0.0) {
            return Err(invalid("camera.roll_speed", "must be finite and >= 0"));
        }
        if !c.position.is_finite() {
            return Err(invalid("camera.position", "must be finite"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn defaults_are_valid() {
        let config = FlightConfig::default();
        config.validate().unwrap();
        assert_eq!(config.quality_step, 0.05);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = FlightConfig::from_yaml_str(
            "scheduler:\n  default_scale: 0.5\n  warmup_ms: 2500\nscene:\n  high_detail: true\n",
        )
        .unwrap();
        assert_eq!(config.scheduler.default_scale, 0.5);
        assert_eq!(config.scheduler.warmup, Duration::from_millis(2500));
        assert_eq!(config.scheduler.frame_budget, Duration::from_millis(30));
        assert!(config.scene.high_detail);
        assert_eq!(config.scene.view_distance, 700.0);
        assert_eq!(config.camera.movement_speed, 50.0);
    }

    #[test]
    fn fractional_budget_from_json() {
        let config =
            FlightConfig::from_json_str(r#"{"scheduler": {"frame_budget_ms": 16.5}}"#).unwrap();
        assert_eq!(config.scheduler.frame_budget, Duration::from_micros(16_500));
    }

    #[test]
    fn yaml_round_trip_preserves_durations() {
        let config = FlightConfig::default();
        let text = config.to_yaml_string().unwrap();
        assert!(text.contains("warmup_ms"));
        let back = FlightConfig::from_yaml_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn sub_microsecond_budget_survives_reload() {
        let mut config = FlightConfig::default();
        config.scheduler.frame_budget = Duration::from_nanos(16_666_667);
        let back = FlightConfig::from_yaml_str(&config.to_yaml_string().unwrap()).unwrap();
        assert_eq!(back.scheduler.frame_budget, Duration::from_nanos(16_666_667));
    }

    #[test]
    fn rejects_non_positive_min_scale() {
        let err = FlightConfig::from_yaml_str("scheduler:\n  min_scale: 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "scheduler.min_scale",
                ..
            }
        ));
    }

    #[test]
    fn rejects_default_scale_out_of_range() {
        let err = FlightConfig::from_yaml_str("scheduler:\n  default_scale: 1.5\n").unwrap_err();
        assert!(err.to_string().contains("default_scale"));
    }

    #[test]
    fn rejects_zero_frame_budget() {
        let err = FlightConfig::from_yaml_str("scheduler:\n  frame_budget_ms: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_negative_warmup() {
        let err = FlightConfig::from_yaml_str("scheduler:\n  warmup_ms: -5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn rejects_negative_speed() {
        let mut config = FlightConfig::default();
        config.camera.roll_speed = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_yaml_and_json_files() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("flight.yaml");
        let mut f = std::fs::File::create(&yaml_path).unwrap();
        writeln!(f, "quality_step: 0.1").unwrap();
        let config = FlightConfig::load(&yaml_path).unwrap();
        assert_eq!(config.quality_step, 0.1);

        let json_path = dir.path().join("flight.json");
        std::fs::write(&json_path, r#"{"camera": {"movement_speed": 12.0}}"#).unwrap();
        let config = FlightConfig::load(&json_path).unwrap();
        assert_eq!(config.camera.movement_speed, 12.0);
    }

    #[test]
    fn load_unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flight.toml");
        std::fs::write(&path, "quality_step = 0.1").unwrap();
        assert!(matches!(
            FlightConfig::load(&path),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FlightConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
