//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod session;

pub use session::{
    // Session lifecycle
    start_session,
    reset_session,
    end_session,
    // Frame input
    queue_frame,
    process_pending,
    push_frame,
    hand_lost,
    // Read-out
    get_trajectory_points,
    get_snapshot_json,
    get_current_movement,
    get_movement_history,
    get_hold_progress,
    is_session_complete,
    // Completion
    mark_completed,
    is_completed,
    get_total_progress,
    reset_progress,
    get_letters_json,
};
