//! Tunable constants for a practice session
//!
//! Every struct has a `Default` matching the tuned values used on device.
//! `SessionConfig` can be parsed from JSON handed over by the page; missing
//! fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::movement::Movement;

/// Adaptive exponential smoothing of the fingertip trail
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Ring capacity in points
    pub capacity: usize,
    /// Alpha used at rest
    pub alpha_min: f32,
    /// Alpha used at or above `velocity_scale`
    pub alpha_max: f32,
    /// When false, alpha stays at `alpha_min`
    pub adaptive: bool,
    /// Per-frame displacement (normalized units) that counts as "fast"
    pub velocity_scale: f32,
    /// Points older than this are trimmed from the tail
    pub max_age_ms: u64,
    /// Smoothed velocity (normalized units per frame) that starts a segment
    pub segment_velocity_threshold: f32,
    pub min_segment_length: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            capacity: 24,
            alpha_min: 0.25,
            alpha_max: 0.75,
            adaptive: true,
            velocity_scale: 0.15,
            max_age_ms: 900,
            segment_velocity_threshold: 0.01,
            min_segment_length: 5,
        }
    }
}

/// Direction classification in view pixels
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Per-axis displacement below which a hand counts as still
    pub threshold_px: f32,
    pub history_capacity: usize,
    /// Whole-trajectory displacement treated as static by the global read-out
    pub static_band_px: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold_px: 30.0,
            history_capacity: 5,
            static_band_px: 20.0,
        }
    }
}

/// Hold-to-confirm timing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldConfig {
    pub required_duration_ms: u64,
    pub reset_delay_ms: u64,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            required_duration_ms: 2000,
            reset_delay_ms: 500,
        }
    }
}

/// Everything a `TrajectoryOrchestrator` needs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub smoothing: SmoothingConfig,
    pub classifier: ClassifierConfig,
    pub hold: HoldConfig,
    /// Landmarks may overshoot [0, 1] by this much before the frame is dropped
    pub coordinate_tolerance: f32,
    /// Labels reported below this confidence are treated as absent
    pub min_gesture_confidence: f32,
    /// Movement sequence that confirms the diacritic stroke
    pub directional_pattern: Vec<Movement>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothingConfig::default(),
            classifier: ClassifierConfig::default(),
            hold: HoldConfig::default(),
            coordinate_tolerance: 0.1,
            min_gesture_confidence: 0.5,
            directional_pattern: vec![Movement::Static, Movement::Left],
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON config; absent fields keep their defaults
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let s = &self.smoothing;
        if s.capacity == 0 {
            return Err(ConfigError::NotPositive { field: "smoothing.capacity" });
        }
        if !(s.alpha_min > 0.0 && s.alpha_min <= s.alpha_max && s.alpha_max <= 1.0) {
            return Err(ConfigError::AlphaRange {
                min: s.alpha_min,
                max: s.alpha_max,
            });
        }
        if s.velocity_scale <= 0.0 {
            return Err(ConfigError::NotPositive { field: "smoothing.velocity_scale" });
        }
        if s.max_age_ms == 0 {
            return Err(ConfigError::NotPositive { field: "smoothing.max_age_ms" });
        }
        if self.classifier.threshold_px <= 0.0 {
            return Err(ConfigError::NotPositive { field: "classifier.threshold_px" });
        }
        if self.classifier.history_capacity == 0 {
            return Err(ConfigError::NotPositive { field: "classifier.history_capacity" });
        }
        if self.hold.required_duration_ms == 0 {
            return Err(ConfigError::NotPositive { field: "hold.required_duration_ms" });
        }
        if self.coordinate_tolerance < 0.0 {
            return Err(ConfigError::NotPositive { field: "coordinate_tolerance" });
        }
        if self.directional_pattern.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        Ok(())
    }
}
