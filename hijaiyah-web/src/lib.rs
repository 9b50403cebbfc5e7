//! Hijaiyah Web - hand trajectory gating for Hijaiyah sign practice
//!
//! Turns a per-frame stream of fingertip landmarks into a smoothed trail,
//! movement directions, a deduplicated movement history and hold-to-confirm
//! success signals for a letter shape and its fathah stroke.
//!
//! Entry point for the WASM module is `bridge`; everything else is plain
//! Rust and tested natively.

use wasm_bindgen::prelude::*;

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub(crate) fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => ($crate::log(&format_args!($($t)*).to_string()))
}
pub(crate) use console_log;

// ============================================================================
// MODULES
// ============================================================================

mod bridge;
pub mod catalog;
pub mod config;
pub mod confirm;
pub mod error;
pub mod geometry;
pub mod movement;
pub mod session;
pub mod trajectory;

pub use bridge::*;
pub use config::{ClassifierConfig, HoldConfig, SessionConfig, SmoothingConfig};
pub use error::{ConfigError, FrameError, MappingError};
pub use geometry::{CoordinateMapper, Point2D, Rotation, Size2D};
pub use movement::{contains_pattern, Movement, MovementHistory};
pub use session::{Frame, GestureTarget, SessionEvent, TrajectoryOrchestrator};
pub use trajectory::{SmoothedTrajectoryBuffer, TrajectorySnapshot};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
