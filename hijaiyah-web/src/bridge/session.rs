//! Practice session store and JS bridge
//!
//! The page runs the hand model, pushes one flat frame per camera tick and
//! reads back events, the trail and hold progress. One session lives in
//! thread-local storage (WASM is single-threaded).

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::catalog::{all_letters, resolve_target, CompletionStore, InMemoryCompletionStore};
use crate::config::SessionConfig;
use crate::session::{Frame, FrameSlot, GestureTarget, SessionEvent, TrajectoryOrchestrator};

// ============================================================================
// STORAGE
// ============================================================================

#[derive(Default)]
struct SessionStore {
    session: Option<TrajectoryOrchestrator>,
    pending: FrameSlot,
    completions: InMemoryCompletionStore,
}

thread_local! {
    static STORE: RefCell<SessionStore> = RefCell::new(SessionStore::default());
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn events_json(events: &[SessionEvent]) -> Result<String, JsValue> {
    serde_json::to_string(events).map_err(to_js)
}

fn log_successes(events: &[SessionEvent]) {
    for event in events {
        match event {
            SessionEvent::BaseGestureSucceeded { label } => {
                crate::console_log!("✅ Letter confirmed: {}", label);
            }
            SessionEvent::DirectionalPatternSucceeded { label } => {
                crate::console_log!("✅ Fathah stroke confirmed: {}", label);
            }
            SessionEvent::LetterCompleted { letter_id } => {
                crate::console_log!("🏅 Letter {} marked completed", letter_id);
            }
            _ => {}
        }
    }
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Start (or replace) the practice session.
///
/// `target` may be an arabic glyph, a gesture label or a transliteration.
/// `config_json` is an optional partial `SessionConfig`.
#[wasm_bindgen]
pub fn start_session(
    target: &str,
    with_fathah: bool,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => SessionConfig::from_json(&json).map_err(to_js)?,
        None => SessionConfig::default(),
    };

    let gesture_target = match resolve_target(target) {
        Some(letter) => GestureTarget::from_letter(letter, with_fathah),
        None => {
            web_sys::console::warn_1(
                &format!("Unknown letter '{}', matching label verbatim", target).into(),
            );
            GestureTarget {
                label: target.to_string(),
                directional: with_fathah,
                letter_id: None,
            }
        }
    };

    let session = TrajectoryOrchestrator::new(gesture_target, config).map_err(to_js)?;
    crate::console_log!(
        "🖐 Session started: {} (fathah: {})",
        session.target().label,
        with_fathah
    );

    STORE.with(|store_cell| {
        let mut store = store_cell.borrow_mut();
        store.session = Some(session);
        store.pending = FrameSlot::new();
    });
    Ok(())
}

/// Queue a frame without processing it; a newer frame replaces an older one.
///
/// Layout: `[x, y, confidence, image_w, image_h, view_w, view_h, rotation,
/// front]` with NaN x/y for "no hand". `timestamp_ms` is page relative
/// (`performance.now()`).
#[wasm_bindgen]
pub fn queue_frame(data: &[f32], timestamp_ms: f64, label: Option<String>) -> Result<(), JsValue> {
    let frame = Frame::from_flat(data, timestamp_ms, label).map_err(to_js)?;
    STORE.with(|store_cell| {
        store_cell.borrow_mut().pending.offer(frame);
    });
    Ok(())
}

/// Process the queued frame, if any. Returns the events as a JSON array.
#[wasm_bindgen]
pub fn process_pending() -> Result<String, JsValue> {
    let events = STORE.with(|store_cell| {
        let mut store = store_cell.borrow_mut();
        let SessionStore {
            session,
            pending,
            completions,
        } = &mut *store;

        let Some(session) = session.as_mut() else {
            return Err(JsValue::from_str("no active session"));
        };
        match session.drain(pending) {
            Some(Ok(events)) => {
                completions.record_events(&events);
                Ok(events)
            }
            Some(Err(err)) => {
                web_sys::console::warn_1(&format!("Frame dropped: {}", err).into());
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    })?;

    log_successes(&events);
    events_json(&events)
}

/// Queue and process in one call
#[wasm_bindgen]
pub fn push_frame(data: &[f32], timestamp_ms: f64, label: Option<String>) -> Result<String, JsValue> {
    queue_frame(data, timestamp_ms, label)?;
    process_pending()
}

/// The hand tracker lost the hand. Returns the events as a JSON array.
#[wasm_bindgen]
pub fn hand_lost() -> Result<String, JsValue> {
    let events = STORE.with(|store_cell| {
        let mut store = store_cell.borrow_mut();
        match store.session.as_mut() {
            Some(session) => {
                let now_ms = session.last_timestamp_ms().unwrap_or(0);
                session.hand_lost(now_ms)
            }
            None => Vec::new(),
        }
    });
    events_json(&events)
}

/// View-space trail as `[x0, y0, x1, y1, ...]`, oldest first
#[wasm_bindgen]
pub fn get_trajectory_points() -> Vec<f32> {
    STORE.with(|store_cell| {
        store_cell
            .borrow()
            .session
            .as_ref()
            .map(|s| s.snapshot().flat_points())
            .unwrap_or_default()
    })
}

/// Latest snapshot (points, ages, movement, history, progress) as JSON
#[wasm_bindgen]
pub fn get_snapshot_json() -> Result<String, JsValue> {
    STORE.with(|store_cell| {
        let store = store_cell.borrow();
        match store.session.as_ref() {
            Some(session) => serde_json::to_string(&*session.snapshot()).map_err(to_js),
            None => Err(JsValue::from_str("no active session")),
        }
    })
}

/// Arrow symbol of the last classified step
#[wasm_bindgen]
pub fn get_current_movement() -> String {
    STORE.with(|store_cell| {
        store_cell
            .borrow()
            .session
            .as_ref()
            .map(|s| s.current_movement().symbol().to_string())
            .unwrap_or_default()
    })
}

/// Movement history as arrow symbols, oldest first
#[wasm_bindgen]
pub fn get_movement_history() -> js_sys::Array {
    STORE.with(|store_cell| {
        let store = store_cell.borrow();
        let history = js_sys::Array::new();
        if let Some(session) = store.session.as_ref() {
            for movement in session.history().to_vec() {
                history.push(&JsValue::from_str(movement.symbol()));
            }
        }
        history
    })
}

#[wasm_bindgen]
pub fn get_hold_progress() -> u8 {
    STORE.with(|store_cell| {
        store_cell
            .borrow()
            .session
            .as_ref()
            .map(|s| s.hold_progress())
            .unwrap_or(0)
    })
}

#[wasm_bindgen]
pub fn is_session_complete() -> bool {
    STORE.with(|store_cell| {
        store_cell
            .borrow()
            .session
            .as_ref()
            .is_some_and(|s| s.is_complete())
    })
}

/// Restart the current session with the same target
#[wasm_bindgen]
pub fn reset_session() {
    STORE.with(|store_cell| {
        let mut store = store_cell.borrow_mut();
        if let Some(session) = store.session.as_mut() {
            session.reset();
        }
        store.pending = FrameSlot::new();
    });
}

#[wasm_bindgen]
pub fn end_session() {
    STORE.with(|store_cell| {
        let mut store = store_cell.borrow_mut();
        store.session = None;
        store.pending = FrameSlot::new();
    });
    web_sys::console::log_1(&"Session ended".into());
}

// ============================================================================
// COMPLETION
// ============================================================================

#[wasm_bindgen]
pub fn mark_completed(id: u32) {
    STORE.with(|store_cell| {
        store_cell.borrow_mut().completions.mark_completed(id);
    });
}

#[wasm_bindgen]
pub fn is_completed(id: u32) -> bool {
    STORE.with(|store_cell| store_cell.borrow().completions.is_completed(id))
}

/// Share of the alphabet completed, 0-100
#[wasm_bindgen]
pub fn get_total_progress() -> u8 {
    STORE.with(|store_cell| store_cell.borrow().completions.total_progress_percent())
}

#[wasm_bindgen]
pub fn reset_progress() {
    STORE.with(|store_cell| store_cell.borrow_mut().completions.reset());
}

/// Letter table for the page's picker
#[wasm_bindgen]
pub fn get_letters_json() -> Result<String, JsValue> {
    serde_json::to_string(all_letters()).map_err(to_js)
}
