//! Per-frame input and the latest-frame mailbox

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{FrameError, FrameResult};
use crate::geometry::{Point2D, Size2D};

/// Values per frame in the flat encoding used by the page:
/// `[x, y, confidence, image_w, image_h, view_w, view_h, rotation, front]`.
/// The timestamp travels separately as f64 to keep millisecond resolution.
pub const FLAT_FRAME_LEN: usize = 9;

/// Gesture label reported by the sign model for this frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureObservation {
    pub label: String,
    pub confidence: f32,
}

/// Everything observed for one camera frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp_ms: u64,
    /// Tracked fingertip in normalized image space; None when no hand
    pub landmark: Option<Point2D>,
    pub gesture: Option<GestureObservation>,
    pub image_size: Size2D,
    pub view_size: Size2D,
    /// Sensor rotation in degrees; validated by the session
    pub rotation_degrees: i32,
    /// Front camera frames are mirrored for display
    pub front_camera: bool,
}

impl Frame {
    /// Frame with a tracked hand and no gesture label
    pub fn with_landmark(
        timestamp_ms: u64,
        landmark: Point2D,
        image_size: Size2D,
        view_size: Size2D,
    ) -> Self {
        Self {
            timestamp_ms,
            landmark: Some(landmark),
            gesture: None,
            image_size,
            view_size,
            rotation_degrees: 0,
            front_camera: false,
        }
    }

    pub fn gesture(mut self, label: impl Into<String>, confidence: f32) -> Self {
        self.gesture = Some(GestureObservation {
            label: label.into(),
            confidence,
        });
        self
    }

    pub fn rotated(mut self, degrees: i32) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    pub fn front_camera(mut self, front: bool) -> Self {
        self.front_camera = front;
        self
    }

    /// Decode the flat encoding. A NaN x or y means no hand this frame;
    /// a non-finite timestamp or rotation rejects the frame.
    pub fn from_flat(data: &[f32], timestamp_ms: f64, label: Option<String>) -> FrameResult<Self> {
        if data.len() != FLAT_FRAME_LEN {
            return Err(FrameError::Malformed {
                expected: FLAT_FRAME_LEN,
                actual: data.len(),
            });
        }
        if !timestamp_ms.is_finite() {
            return Err(FrameError::NonFinite {
                field: "timestamp_ms",
                value: timestamp_ms,
            });
        }
        if !data[7].is_finite() {
            return Err(FrameError::NonFinite {
                field: "rotation",
                value: f64::from(data[7]),
            });
        }

        let (x, y) = (data[0], data[1]);
        let landmark = if x.is_nan() || y.is_nan() {
            None
        } else {
            Some(Point2D::new(x, y))
        };

        let gesture = label.map(|label| GestureObservation {
            label,
            confidence: data[2],
        });

        Ok(Self {
            timestamp_ms: timestamp_ms.max(0.0) as u64,
            landmark,
            gesture,
            image_size: Size2D::new(data[3] as i32, data[4] as i32),
            view_size: Size2D::new(data[5] as i32, data[6] as i32),
            rotation_degrees: data[7].round() as i32,
            front_camera: data[8] >= 0.5,
        })
    }
}

/// Single-slot mailbox: a newer frame replaces any unprocessed one
#[derive(Debug, Default)]
pub struct FrameSlot {
    pending: Option<Frame>,
    superseded: u64,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `frame`; returns true when it replaced a pending frame
    pub fn offer(&mut self, frame: Frame) -> bool {
        let replaced = self.pending.replace(frame).is_some();
        if replaced {
            self.superseded += 1;
            trace!(superseded = self.superseded, "pending frame superseded");
        }
        replaced
    }

    pub fn take(&mut self) -> Option<Frame> {
        self.pending.take()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }

    /// Frames discarded before they were processed
    pub fn superseded_count(&self) -> u64 {
        self.superseded
    }
}
