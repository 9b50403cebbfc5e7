//! Catalog module - letter table, label matching and completion tracking
//!
//! Re-exports only. All logic in submodules.

mod letters;
mod progress;

pub use letters::{
    all_letters, find_by_arabic, find_by_gesture, find_by_id, find_by_transliteration,
    is_absent_label, labels_match, resolve_target, search, Letter, LETTERS, LETTER_COUNT,
};
pub use progress::{CompletionStore, InMemoryCompletionStore};
