//! Confirm module - hold-duration FSM and the directional pattern gate
//!
//! Re-exports only. All logic in submodules.

mod gate;
mod hold;

pub use gate::{GatePhase, PatternGate};
pub use hold::{HoldConfirmation, HoldPhase, HoldSignal, HoldState};
