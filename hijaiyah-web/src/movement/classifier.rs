//! Frame-to-frame direction classification in view pixels
//!
//! Diagonals win over cardinal directions when both axes pass the
//! threshold; a tie on |dx| == |dy| with only one axis past it is Unknown.

use tracing::trace;

use super::direction::Movement;
use crate::config::ClassifierConfig;
use crate::geometry::Point2D;

/// Classify the step `prev -> curr`, both in view space.
///
/// Total over finite inputs; `classify(p, p, t) == Static` for any t > 0.
pub fn classify(prev: Point2D, curr: Point2D, threshold_px: f32) -> Movement {
    let dx = curr.x - prev.x;
    let dy = curr.y - prev.y;
    let t = threshold_px;

    if dx.abs() < t && dy.abs() < t {
        return Movement::Static;
    }

    let movement = if dx < -t && dy < -t {
        Movement::DiagUpLeft
    } else if dx > t && dy < -t {
        Movement::DiagUpRight
    } else if dx < -t && dy > t {
        Movement::DiagDownLeft
    } else if dx > t && dy > t {
        Movement::DiagDownRight
    } else if dx.abs() > dy.abs() && dx > t {
        Movement::Right
    } else if dx.abs() > dy.abs() && dx < -t {
        Movement::Left
    } else if dy.abs() > dx.abs() && dy > t {
        Movement::Down
    } else if dy.abs() > dx.abs() && dy < -t {
        Movement::Up
    } else {
        Movement::Unknown
    };

    trace!(dx, dy, ?movement, "classified step");
    movement
}

/// Stateful wrapper remembering the previous view-space position
#[derive(Clone, Debug)]
pub struct MovementClassifier {
    threshold_px: f32,
    last: Option<Point2D>,
}

impl MovementClassifier {
    pub fn new(threshold_px: f32) -> Self {
        Self {
            threshold_px,
            last: None,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.threshold_px)
    }

    /// Classify against the previous position and remember `curr`.
    /// The first position after a reset is Static.
    pub fn update(&mut self, curr: Point2D) -> Movement {
        let movement = match self.last {
            Some(prev) => classify(prev, curr, self.threshold_px),
            None => Movement::Static,
        };
        self.last = Some(curr);
        movement
    }

    pub fn last_position(&self) -> Option<Point2D> {
        self.last
    }

    pub fn threshold_px(&self) -> f32 {
        self.threshold_px
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for MovementClassifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}
