//! Session module - frame input, events and the per-frame orchestrator
//!
//! Re-exports only. All logic in submodules.

mod events;
mod frame;
mod orchestrator;

pub use events::SessionEvent;
pub use frame::{Frame, FrameSlot, GestureObservation, FLAT_FRAME_LEN};
pub use orchestrator::{GestureTarget, TrajectoryOrchestrator};
