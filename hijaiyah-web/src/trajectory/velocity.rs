//! Velocity history parallel to the trajectory ring
//!
//! Holds the step length between consecutive smoothed points. Used for the
//! average-speed read-out and for splitting the trail into fast segments.

use std::collections::VecDeque;

/// Default window for `average`
pub const AVERAGE_WINDOW: usize = 5;

/// Bounded history of per-step speeds, oldest first
#[derive(Clone, Debug, PartialEq)]
pub struct VelocityTracker {
    history: VecDeque<f32>,
    capacity: usize,
}

impl VelocityTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, velocity: f32) {
        self.history.push_back(velocity);
        if self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    /// Mean of the newest `window` entries; 0 when empty
    pub fn average(&self, window: usize) -> f32 {
        let n = window.min(self.history.len());
        if n == 0 {
            return 0.0;
        }
        let sum: f32 = self.history.iter().rev().take(n).sum();
        sum / n as f32
    }

    /// Inclusive index ranges of runs at or above `threshold` lasting at
    /// least `min_len` entries
    pub fn segments(&self, threshold: f32, min_len: usize) -> Vec<(usize, usize)> {
        let mut segments = Vec::new();
        let mut run_start: Option<usize> = None;

        for (i, &v) in self.history.iter().enumerate() {
            match (v >= threshold, run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    if i - start >= min_len {
                        segments.push((start, i - 1));
                    }
                    run_start = None;
                }
                _ => {}
            }
        }

        if let Some(start) = run_start {
            if self.history.len() - start >= min_len {
                segments.push((start, self.history.len() - 1));
            }
        }

        segments
    }

    /// Drop up to `n` of the oldest entries
    pub fn trim_front(&mut self, n: usize) {
        let n = n.min(self.history.len());
        self.history.drain(..n);
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.history.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_uses_newest_window() {
        let mut tracker = VelocityTracker::new(8);
        assert_eq!(tracker.average(AVERAGE_WINDOW), 0.0);
        for v in [10.0, 1.0, 2.0, 3.0] {
            tracker.push(v);
        }
        assert!((tracker.average(3) - 2.0).abs() < 1e-6);
        assert!((tracker.average(100) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_capacity_bounds_history() {
        let mut tracker = VelocityTracker::new(3);
        for v in 0..10 {
            tracker.push(v as f32);
        }
        assert_eq!(tracker.to_vec(), vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_segments_need_min_length() {
        let mut tracker = VelocityTracker::new(32);
        let speeds = [
            0.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.0, // run 1..=5, length 5
            0.5, 0.5, 0.0, // too short
            0.5, 0.5, 0.5, 0.5, 0.5, 0.5, // trailing run 10..=15
        ];
        for v in speeds {
            tracker.push(v);
        }
        assert_eq!(tracker.segments(0.1, 5), vec![(1, 5), (10, 15)]);
        assert!(tracker.segments(1.0, 5).is_empty());
    }

    #[test]
    fn test_trim_front() {
        let mut tracker = VelocityTracker::new(5);
        for v in [1.0, 2.0, 3.0] {
            tracker.push(v);
        }
        tracker.trim_front(2);
        assert_eq!(tracker.to_vec(), vec![3.0]);
        tracker.trim_front(10);
        assert!(tracker.is_empty());
    }
}
