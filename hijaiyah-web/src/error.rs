//! Error types for frame validation, coordinate mapping and configuration
//!
//! Every per-frame error is recoverable: the frame is dropped before any
//! session state mutates.

use thiserror::Error;

/// Geometry failures while building or applying a coordinate transform
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    #[error("invalid rotation {0}°, expected one of 0, 90, 180, 270")]
    InvalidRotation(i32),

    #[error("degenerate {which} size {width}x{height}")]
    DegenerateSize {
        which: &'static str,
        width: i32,
        height: i32,
    },
}

pub type MappingResult<T> = Result<T, MappingError>;

/// Reasons a frame is rejected by the session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("coordinate ({x:.3}, {y:.3}) outside tolerance ±{tolerance}")]
    OutOfToleranceCoordinate { x: f32, y: f32, tolerance: f32 },

    #[error("invalid rotation {0}°")]
    InvalidRotation(i32),

    #[error("degenerate view or image size: {0}")]
    DegenerateViewSize(MappingError),

    #[error("late frame at {timestamp_ms}ms, last processed {last_ms}ms")]
    OutOfOrder { timestamp_ms: u64, last_ms: u64 },

    #[error("malformed frame: expected {expected} values, got {actual}")]
    Malformed { expected: usize, actual: usize },

    #[error("malformed frame: {field} is {value}")]
    NonFinite { field: &'static str, value: f64 },
}

pub type FrameResult<T> = Result<T, FrameError>;

impl From<MappingError> for FrameError {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::InvalidRotation(deg) => FrameError::InvalidRotation(deg),
            other => FrameError::DegenerateViewSize(other),
        }
    }
}

/// Configuration values that cannot drive a working session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("smoothing alpha range [{min}, {max}] must satisfy 0 < min <= max <= 1")]
    AlphaRange { min: f32, max: f32 },

    #[error("movement pattern must not be empty")]
    EmptyPattern,

    #[error("invalid config json: {0}")]
    Json(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}
