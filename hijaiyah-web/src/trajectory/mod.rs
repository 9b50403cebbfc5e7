//! Trajectory module - smoothed trail, velocity history and snapshots
//!
//! Re-exports only. All logic in submodules.

mod buffer;
mod snapshot;
mod velocity;

pub use buffer::{SmoothedTrajectoryBuffer, TrajectorySample};
pub use snapshot::{SnapshotPublisher, TrajectoryData, TrajectorySnapshot};
pub use velocity::{VelocityTracker, AVERAGE_WINDOW};
