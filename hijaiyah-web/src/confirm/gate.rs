//! Directional phase gate
//!
//! Armed once the base hold succeeds. While the base label stays correct it
//! watches the movement history for the diacritic pattern and latches on the
//! first match, so success fires exactly once per session.

use tracing::{debug, info};

use crate::movement::{contains_pattern, Movement, MovementHistory};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatePhase {
    /// Base gesture not confirmed yet
    Dormant,
    /// Waiting for the pattern while `label` is held
    Armed { label: String },
    /// Pattern seen; stays here until reset
    Latched { label: String },
}

#[derive(Clone, Debug)]
pub struct PatternGate {
    pattern: Vec<Movement>,
    phase: GatePhase,
}

impl PatternGate {
    pub fn new(pattern: Vec<Movement>) -> Self {
        Self {
            pattern,
            phase: GatePhase::Dormant,
        }
    }

    /// Start watching for `label`. Only leaves Dormant; returns whether the
    /// gate changed.
    pub fn arm(&mut self, label: &str) -> bool {
        if self.phase != GatePhase::Dormant {
            return false;
        }
        debug!(label, pattern = ?self.pattern, "directional gate armed");
        self.phase = GatePhase::Armed {
            label: label.to_string(),
        };
        true
    }

    /// Check one frame. Returns the label on the frame the pattern is first
    /// matched while the base label is still correct.
    pub fn evaluate(&mut self, is_correct: bool, history: &MovementHistory) -> Option<String> {
        let GatePhase::Armed { label } = &self.phase else {
            return None;
        };
        if !is_correct || !contains_pattern(history, &self.pattern) {
            return None;
        }

        let label = label.clone();
        info!(label = %label, history = ?history.to_vec(), "directional pattern confirmed");
        self.phase = GatePhase::Latched {
            label: label.clone(),
        };
        Some(label)
    }

    pub fn phase(&self) -> &GatePhase {
        &self.phase
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.phase, GatePhase::Armed { .. })
    }

    pub fn is_latched(&self) -> bool {
        matches!(self.phase, GatePhase::Latched { .. })
    }

    pub fn pattern(&self) -> &[Movement] {
        &self.pattern
    }

    pub fn reset(&mut self) {
        self.phase = GatePhase::Dormant;
    }
}
