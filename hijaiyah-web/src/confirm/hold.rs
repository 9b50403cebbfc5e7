//! Hold-to-confirm state machine
//!
//! ```text
//!            correct+static (new label)
//!   Idle ─────────────────────────────▶ Accumulating ──elapsed ≥ required──▶ Succeeded
//!    ▲                                      │   ▲
//!    │ deadline passed                      │   │ correct+moving: freeze,
//!    │                                      │   │ resume keeps elapsed
//!   DebounceHold ◀──────── mismatch ────────┘───┘
//! ```
//!
//! Succeeded is terminal until `reset()`.

use tracing::{debug, info};

use crate::config::HoldConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldPhase {
    Idle,
    Accumulating,
    Succeeded,
    /// No accumulation may start before `until_ms`
    DebounceHold { until_ms: u64 },
}

/// Bookkeeping for the label currently being held
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoldState {
    pub active_label: Option<String>,
    pub start_time_ms: Option<u64>,
    pub elapsed_ms: u64,
    pub reset_deadline_ms: Option<u64>,
    /// Hand moved while the label stayed correct; elapsed is paused
    pub frozen: bool,
}

/// Outcome of one `on_frame` call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HoldSignal {
    /// Nothing held
    Idle,
    /// Waiting out the reset delay
    Debouncing { remaining_ms: u64 },
    /// Accumulating, percent 0-100
    Progress(u8),
    /// Paused at this percent while the hand moves
    Frozen(u8),
    /// Required duration reached on this frame
    Succeeded(String),
    /// Active hold dropped on this frame
    Reset,
    /// Already succeeded; ignoring frames until reset
    Done,
}

#[derive(Clone, Debug)]
pub struct HoldConfirmation {
    config: HoldConfig,
    phase: HoldPhase,
    state: HoldState,
}

impl HoldConfirmation {
    pub fn new(config: HoldConfig) -> Self {
        Self {
            config,
            phase: HoldPhase::Idle,
            state: HoldState::default(),
        }
    }

    /// Advance with one frame's observation.
    ///
    /// `label` is the detected gesture label (None when absent),
    /// `is_correct` whether it matches the target, `is_static` whether the
    /// hand stayed still since the previous frame.
    pub fn on_frame(
        &mut self,
        label: Option<&str>,
        is_correct: bool,
        is_static: bool,
        now_ms: u64,
    ) -> HoldSignal {
        match self.phase {
            HoldPhase::Succeeded => return HoldSignal::Done,
            HoldPhase::DebounceHold { until_ms } => {
                if now_ms < until_ms {
                    return HoldSignal::Debouncing {
                        remaining_ms: until_ms - now_ms,
                    };
                }
                debug!(now_ms, "hold debounce expired");
                self.phase = HoldPhase::Idle;
                self.state.reset_deadline_ms = None;
            }
            HoldPhase::Idle | HoldPhase::Accumulating => {}
        }

        match label {
            Some(label) if is_correct => {
                if is_static {
                    self.accumulate(label, now_ms)
                } else {
                    self.freeze(label)
                }
            }
            _ => self.mismatch(now_ms),
        }
    }

    fn accumulate(&mut self, label: &str, now_ms: u64) -> HoldSignal {
        if self.state.active_label.as_deref() != Some(label) {
            debug!(label, now_ms, "hold started");
            self.state = HoldState {
                active_label: Some(label.to_string()),
                start_time_ms: Some(now_ms),
                ..HoldState::default()
            };
            self.phase = HoldPhase::Accumulating;
            return HoldSignal::Progress(0);
        }

        if self.state.frozen {
            // Shift the start so the paused interval does not count
            self.state.start_time_ms = Some(now_ms.saturating_sub(self.state.elapsed_ms));
            self.state.frozen = false;
            debug!(label, elapsed_ms = self.state.elapsed_ms, "hold resumed");
        }

        let start = self.state.start_time_ms.unwrap_or(now_ms);
        self.state.elapsed_ms = now_ms.saturating_sub(start);

        if self.state.elapsed_ms >= self.config.required_duration_ms {
            info!(label, elapsed_ms = self.state.elapsed_ms, "hold confirmed");
            self.phase = HoldPhase::Succeeded;
            return HoldSignal::Succeeded(label.to_string());
        }
        HoldSignal::Progress(self.progress())
    }

    fn freeze(&mut self, label: &str) -> HoldSignal {
        if self.state.active_label.as_deref() != Some(label) {
            // A new label only starts accumulating once the hand is still
            return match self.state.active_label {
                Some(_) => HoldSignal::Frozen(self.progress()),
                None => HoldSignal::Idle,
            };
        }
        if !self.state.frozen {
            debug!(label, elapsed_ms = self.state.elapsed_ms, "hold frozen");
            self.state.frozen = true;
        }
        HoldSignal::Frozen(self.progress())
    }

    fn mismatch(&mut self, now_ms: u64) -> HoldSignal {
        if self.state.active_label.is_none() {
            return HoldSignal::Idle;
        }
        let until_ms = now_ms.saturating_add(self.config.reset_delay_ms);
        debug!(
            label = ?self.state.active_label,
            until_ms,
            "hold lost, debouncing"
        );
        self.state = HoldState {
            reset_deadline_ms: Some(until_ms),
            ..HoldState::default()
        };
        self.phase = HoldPhase::DebounceHold { until_ms };
        HoldSignal::Reset
    }

    /// Percent of the required duration held so far, 0-100
    pub fn progress(&self) -> u8 {
        if self.phase == HoldPhase::Succeeded {
            return 100;
        }
        let required = self.config.required_duration_ms.max(1);
        (self.state.elapsed_ms.saturating_mul(100) / required).min(100) as u8
    }

    pub fn phase(&self) -> &HoldPhase {
        &self.phase
    }

    pub fn state(&self) -> &HoldState {
        &self.state
    }

    pub fn is_succeeded(&self) -> bool {
        self.phase == HoldPhase::Succeeded
    }

    pub fn config(&self) -> &HoldConfig {
        &self.config
    }

    /// Forget the held label without starting over. A pending reset delay
    /// stays in force. Returns true when an active hold was dropped.
    pub fn drop_hold(&mut self) -> bool {
        match self.phase {
            HoldPhase::Succeeded | HoldPhase::DebounceHold { .. } => false,
            HoldPhase::Idle | HoldPhase::Accumulating => {
                let dropped = self.state.active_label.is_some();
                self.phase = HoldPhase::Idle;
                self.state = HoldState::default();
                dropped
            }
        }
    }

    /// Back to Idle with no pending debounce
    pub fn reset(&mut self) {
        self.phase = HoldPhase::Idle;
        self.state = HoldState::default();
    }
}

impl Default for HoldConfirmation {
    fn default() -> Self {
        Self::new(HoldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_quarters_to_success() {
        let mut fsm = HoldConfirmation::default();
        let expected = [0u8, 25, 50, 75];
        for (i, want) in expected.iter().enumerate() {
            let signal = fsm.on_frame(Some("BA"), true, true, i as u64 * 500);
            assert_eq!(signal, HoldSignal::Progress(*want));
        }
        assert_eq!(
            fsm.on_frame(Some("BA"), true, true, 2000),
            HoldSignal::Succeeded("BA".to_string())
        );
        assert_eq!(fsm.progress(), 100);
        assert!(fsm.is_succeeded());
        assert_eq!(fsm.on_frame(Some("BA"), true, true, 2100), HoldSignal::Done);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut fsm = HoldConfirmation::default();
        let mut last = 0;
        for t in (0..=2000).step_by(33) {
            fsm.on_frame(Some("ALIF"), true, true, t);
            let p = fsm.progress();
            assert!(p >= last, "{p} < {last} at {t}");
            last = p;
        }
    }

    #[test]
    fn test_mismatch_debounces() {
        let mut fsm = HoldConfirmation::default();
        fsm.on_frame(Some("BA"), true, true, 0);
        fsm.on_frame(Some("BA"), true, true, 800);
        assert_eq!(fsm.on_frame(Some("TA"), false, true, 1000), HoldSignal::Reset);
        assert_eq!(fsm.state().reset_deadline_ms, Some(1500));
        assert_eq!(fsm.progress(), 0);

        assert_eq!(
            fsm.on_frame(Some("BA"), true, true, 1200),
            HoldSignal::Debouncing { remaining_ms: 300 }
        );
        assert_eq!(
            fsm.on_frame(Some("BA"), true, true, 1499),
            HoldSignal::Debouncing { remaining_ms: 1 }
        );
        assert_eq!(fsm.on_frame(Some("BA"), true, true, 1500), HoldSignal::Progress(0));
        assert_eq!(fsm.phase(), &HoldPhase::Accumulating);
    }

    #[test]
    fn test_missing_label_when_idle_stays_idle() {
        let mut fsm = HoldConfirmation::default();
        assert_eq!(fsm.on_frame(None, false, true, 0), HoldSignal::Idle);
        assert_eq!(fsm.phase(), &HoldPhase::Idle);
    }

    #[test]
    fn test_freeze_and_resume_keeps_elapsed() {
        let mut fsm = HoldConfirmation::default();
        fsm.on_frame(Some("BA"), true, true, 0);
        assert_eq!(fsm.on_frame(Some("BA"), true, true, 1000), HoldSignal::Progress(50));

        // Moving for 3 s does not count
        assert_eq!(fsm.on_frame(Some("BA"), true, false, 1500), HoldSignal::Frozen(50));
        assert_eq!(fsm.on_frame(Some("BA"), true, false, 4000), HoldSignal::Frozen(50));

        // Resume: the start shifts so elapsed continues from 1000
        assert_eq!(fsm.on_frame(Some("BA"), true, true, 4100), HoldSignal::Progress(50));
        assert_eq!(fsm.on_frame(Some("BA"), true, true, 4600), HoldSignal::Progress(75));
        assert_eq!(
            fsm.on_frame(Some("BA"), true, true, 5100),
            HoldSignal::Succeeded("BA".to_string())
        );
    }

    #[test]
    fn test_new_label_restarts() {
        let mut fsm = HoldConfirmation::default();
        fsm.on_frame(Some("BA"), true, true, 0);
        fsm.on_frame(Some("BA"), true, true, 1000);
        assert_eq!(fsm.on_frame(Some("ba2"), true, true, 1100), HoldSignal::Progress(0));
        assert_eq!(fsm.state().active_label.as_deref(), Some("ba2"));
        assert_eq!(fsm.state().start_time_ms, Some(1100));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut fsm = HoldConfirmation::default();
        fsm.on_frame(Some("BA"), true, true, 0);
        fsm.on_frame(Some("BA"), true, true, 2500);
        assert!(fsm.is_succeeded());

        fsm.reset();
        fsm.reset();
        assert_eq!(fsm.phase(), &HoldPhase::Idle);
        assert_eq!(fsm.state(), &HoldState::default());
        assert_eq!(fsm.on_frame(Some("BA"), true, true, 3000), HoldSignal::Progress(0));
    }

    #[test]
    fn test_drop_hold_keeps_pending_debounce() {
        let mut fsm = HoldConfirmation::default();
        fsm.on_frame(Some("BA"), true, true, 0);
        fsm.on_frame(Some("TA"), false, true, 400);
        assert!(!fsm.drop_hold());
        assert_eq!(fsm.phase(), &HoldPhase::DebounceHold { until_ms: 900 });
        assert_eq!(
            fsm.on_frame(Some("BA"), true, true, 450),
            HoldSignal::Debouncing { remaining_ms: 450 }
        );

        let mut fsm = HoldConfirmation::default();
        fsm.on_frame(Some("BA"), true, true, 0);
        assert!(fsm.drop_hold());
        assert_eq!(fsm.phase(), &HoldPhase::Idle);
        assert!(!fsm.drop_hold());
    }

    #[test]
    fn test_deadline_saturates_at_end_of_time() {
        let mut fsm = HoldConfirmation::default();
        fsm.on_frame(Some("BA"), true, true, u64::MAX);
        assert_eq!(fsm.on_frame(Some("TA"), false, true, u64::MAX), HoldSignal::Reset);
        assert_eq!(fsm.phase(), &HoldPhase::DebounceHold { until_ms: u64::MAX });
    }
}
