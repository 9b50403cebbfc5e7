//! Smoothed fingertip trail
//!
//! Fixed-capacity ring of exponentially smoothed points in normalized landmark
//! space. Alpha adapts to speed: slow motion is smoothed hard, fast strokes
//! follow the raw point closely.

use tracing::trace;

use super::snapshot::TrajectoryData;
use super::velocity::{VelocityTracker, AVERAGE_WINDOW};
use crate::config::SmoothingConfig;
use crate::geometry::{distance, Point2D};

/// One stored point and the frame time it was captured at
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySample {
    pub point: Point2D,
    pub timestamp_ms: u64,
}

impl TrajectorySample {
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp_ms)
    }
}

/// Ring buffer with adaptive EMA smoothing and a parallel velocity history
#[derive(Clone, Debug)]
pub struct SmoothedTrajectoryBuffer {
    config: SmoothingConfig,

    /// Circular storage; `None` only before first wrap
    samples: Vec<Option<TrajectorySample>>,

    /// Next slot to write
    write_index: usize,

    /// Number of live samples
    len: usize,

    /// Last smoothed point; survives eviction so smoothing stays continuous
    anchor: Option<Point2D>,

    velocities: VelocityTracker,
}

impl SmoothedTrajectoryBuffer {
    pub fn new(config: SmoothingConfig) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            samples: vec![None; capacity],
            write_index: 0,
            len: 0,
            anchor: None,
            velocities: VelocityTracker::new(capacity),
            config,
        }
    }

    // ========================================================================
    // WRITE
    // ========================================================================

    /// Smooth `raw` against the previous point, store it, return the result
    pub fn push_point(&mut self, raw: Point2D, timestamp_ms: u64) -> Point2D {
        let smoothed = match self.anchor {
            None => raw,
            Some(prev) => {
                let alpha = self.effective_alpha(distance(raw, prev));
                Point2D::new(
                    prev.x + alpha * (raw.x - prev.x),
                    prev.y + alpha * (raw.y - prev.y),
                )
            }
        };

        if let Some(latest) = self.latest() {
            self.velocities.push(distance(latest, smoothed));
        }

        let capacity = self.capacity();
        self.samples[self.write_index] = Some(TrajectorySample {
            point: smoothed,
            timestamp_ms,
        });
        self.write_index = (self.write_index + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
        self.anchor = Some(smoothed);

        trace!(x = smoothed.x, y = smoothed.y, len = self.len, "trajectory point");
        smoothed
    }

    /// alpha_min at rest, rising linearly to alpha_max at `velocity_scale`
    fn effective_alpha(&self, raw_velocity: f32) -> f32 {
        let c = &self.config;
        if !c.adaptive {
            return c.alpha_min;
        }
        let v_norm = (raw_velocity / c.velocity_scale).clamp(0.0, 1.0);
        c.alpha_min + (c.alpha_max - c.alpha_min) * v_norm
    }

    /// Drop samples older than `max_age_ms`, oldest first. Returns how many
    /// were removed.
    pub fn trim_expired(&mut self, now_ms: u64) -> usize {
        let max_age = self.config.max_age_ms;
        let mut removed = 0;
        while let Some(oldest) = self.oldest() {
            if oldest.age_ms(now_ms) <= max_age {
                break;
            }
            let idx = self.oldest_index();
            self.samples[idx] = None;
            self.len -= 1;
            removed += 1;
        }

        if removed > 0 {
            let keep = self.len.saturating_sub(1);
            let excess = self.velocities.len().saturating_sub(keep);
            self.velocities.trim_front(excess);
            if self.len == 0 {
                self.anchor = None;
            }
            trace!(removed, remaining = self.len, "trimmed expired points");
        }
        removed
    }

    /// Empty the ring, the velocity history and the smoothing anchor
    pub fn clear(&mut self) {
        self.samples.iter_mut().for_each(|slot| *slot = None);
        self.write_index = 0;
        self.len = 0;
        self.anchor = None;
        self.velocities.clear();
    }

    // ========================================================================
    // READ
    // ========================================================================

    fn oldest_index(&self) -> usize {
        let capacity = self.capacity();
        (self.write_index + capacity - self.len) % capacity
    }

    fn sample_at(&self, i: usize) -> Option<TrajectorySample> {
        if i >= self.len {
            return None;
        }
        self.samples[(self.oldest_index() + i) % self.capacity()]
    }

    fn oldest(&self) -> Option<TrajectorySample> {
        self.sample_at(0)
    }

    /// Samples oldest to newest
    pub fn samples(&self) -> Vec<TrajectorySample> {
        (0..self.len).filter_map(|i| self.sample_at(i)).collect()
    }

    /// Points oldest to newest
    pub fn as_list(&self) -> Vec<Point2D> {
        (0..self.len)
            .filter_map(|i| self.sample_at(i))
            .map(|s| s.point)
            .collect()
    }

    pub fn latest(&self) -> Option<Point2D> {
        self.len
            .checked_sub(1)
            .and_then(|i| self.sample_at(i))
            .map(|s| s.point)
    }

    /// Points at indices `start..=end`; empty when the range is invalid
    pub fn points_in_range(&self, start: usize, end: usize) -> Vec<Point2D> {
        if start > end || end >= self.len {
            return Vec::new();
        }
        (start..=end)
            .filter_map(|i| self.sample_at(i))
            .map(|s| s.point)
            .collect()
    }

    /// Index ranges (into the velocity history) of fast strokes
    pub fn detect_segments(&self) -> Vec<(usize, usize)> {
        self.velocities.segments(
            self.config.segment_velocity_threshold,
            self.config.min_segment_length,
        )
    }

    pub fn average_velocity(&self, window: usize) -> f32 {
        self.velocities.average(window)
    }

    pub fn recent_velocity(&self) -> f32 {
        self.average_velocity(AVERAGE_WINDOW)
    }

    pub fn velocities(&self) -> Vec<f32> {
        self.velocities.to_vec()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    // ========================================================================
    // EXPORT / IMPORT
    // ========================================================================

    pub fn export(&self, timestamp_ms: u64) -> TrajectoryData {
        TrajectoryData {
            points: self.as_list(),
            velocities: self.velocities(),
            timestamp_ms,
            capacity: self.capacity(),
            smoothing_alpha: self.config.alpha_min,
        }
    }

    /// Replace the contents by replaying `data.points` through the smoother.
    /// All replayed samples are stamped with `timestamp_ms`.
    pub fn import(&mut self, data: &TrajectoryData, timestamp_ms: u64) {
        self.clear();
        for p in &data.points {
            self.push_point(*p, timestamp_ms);
        }
    }
}

impl Default for SmoothedTrajectoryBuffer {
    fn default() -> Self {
        Self::new(SmoothingConfig::default())
    }
}
