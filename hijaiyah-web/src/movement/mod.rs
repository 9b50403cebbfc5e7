//! Movement module - direction classification, history and pattern search
//!
//! Re-exports only. All logic in submodules.

mod classifier;
mod direction;
mod history;
mod pattern;
mod sector;

pub use classifier::{classify, MovementClassifier};
pub use direction::Movement;
pub use history::{MovementHistory, DEFAULT_HISTORY_CAPACITY};
pub use pattern::{contains_pattern, contains_subsequence, PATTERN_WINDOWS};
pub use sector::{global_direction, sector_of};
