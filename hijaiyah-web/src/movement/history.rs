//! Bounded, deduplicated movement history
//!
//! Invariants: `len() <= capacity` and no two adjacent entries are equal.

use std::collections::VecDeque;

use tracing::debug;

use super::direction::Movement;

pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct MovementHistory {
    entries: VecDeque<Movement>,
    capacity: usize,
}

impl MovementHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Capacity is at least one
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append unless equal to the last entry; evicts the oldest when full.
    /// Returns true when the history changed.
    pub fn push(&mut self, movement: Movement) -> bool {
        if self.entries.back() == Some(&movement) {
            return false;
        }

        self.entries.push_back(movement);
        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                debug!(?evicted, "movement history full, dropped oldest");
            }
        }
        true
    }

    /// Clear and start over from a single baseline entry
    pub fn seed(&mut self, baseline: Movement) {
        self.entries.clear();
        self.entries.push_back(baseline);
    }

    /// Last `n` entries, oldest first
    pub fn tail(&self, n: usize) -> Vec<Movement> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).copied().collect()
    }

    pub fn last(&self) -> Option<Movement> {
        self.entries.back().copied()
    }

    pub fn to_vec(&self) -> Vec<Movement> {
        self.entries.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for MovementHistory {
    fn default() -> Self {
        Self::new()
    }
}
