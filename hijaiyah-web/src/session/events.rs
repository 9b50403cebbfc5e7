//! Events emitted by the session, serialized as tagged JSON for the page

use serde::{Deserialize, Serialize};

use crate::movement::Movement;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A new entry was appended to the movement history
    Movement { movement: Movement },
    /// Base letter shape held for this share of the required time
    BaseGestureHeld { progress_percent: u8 },
    BaseGestureSucceeded { label: String },
    /// Diacritic stroke performed after the base letter was confirmed
    DirectionalPatternSucceeded { label: String },
    /// Every step of the target is done; the catalog letter can be marked
    LetterCompleted { letter_id: u8 },
    /// An in-progress hold was dropped
    HoldReset,
    HandLost,
}

impl SessionEvent {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SessionEvent::BaseGestureSucceeded { .. } | SessionEvent::DirectionalPatternSucceeded { .. }
        )
    }
}
