//! Immutable views of the trail handed to renderers and storage
//!
//! The frame path builds a fresh `TrajectorySnapshot` and swaps it into the
//! publisher; readers clone the `Arc` and never observe a half-written frame.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;
use crate::movement::Movement;

/// Serializable dump of a trajectory buffer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryData {
    pub points: Vec<Point2D>,
    pub velocities: Vec<f32>,
    pub timestamp_ms: u64,
    pub capacity: usize,
    pub smoothing_alpha: f32,
}

/// What the overlay needs to draw one frame
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySnapshot {
    /// View-space points, oldest first
    pub points: Vec<Point2D>,
    /// Age of each point in ms, parallel to `points`
    pub ages_ms: Vec<u64>,
    pub current_movement: Movement,
    /// Direction from the first to the last point of the trail
    pub global_direction: Movement,
    pub history: Vec<Movement>,
    /// Fast strokes as inclusive ranges over the step velocities
    pub segments: Vec<(usize, usize)>,
    /// Mean step length over the latest velocities, normalized units
    pub average_velocity: f32,
    pub hold_progress: u8,
    pub timestamp_ms: u64,
}

impl TrajectorySnapshot {
    /// Points flattened as `[x0, y0, x1, y1, ...]`
    pub fn flat_points(&self) -> Vec<f32> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Shared slot holding the latest snapshot
#[derive(Clone, Debug, Default)]
pub struct SnapshotPublisher {
    current: Arc<RwLock<Arc<TrajectorySnapshot>>>,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published snapshot
    pub fn publish(&self, snapshot: TrajectorySnapshot) {
        let next = Arc::new(snapshot);
        // A poisoned lock still holds a complete Arc; keep publishing
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }

    /// Latest snapshot; cheap to call from any thread
    pub fn latest(&self) -> Arc<TrajectorySnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    pub fn clear(&self) {
        self.publish(TrajectorySnapshot::default());
    }
}
