//! Completion tracking
//!
//! Persistence lives outside this crate; the page implements the trait over
//! its own storage. `InMemoryCompletionStore` backs tests and the wasm
//! session.

use std::collections::BTreeSet;

use super::letters::LETTER_COUNT;
use crate::session::SessionEvent;

pub trait CompletionStore {
    fn mark_completed(&mut self, id: u32);
    fn is_completed(&self, id: u32) -> bool;

    /// Mark every letter a session reported as completed. Returns how many
    /// were newly marked.
    fn record_events(&mut self, events: &[SessionEvent]) -> usize {
        let mut marked = 0;
        for event in events {
            if let SessionEvent::LetterCompleted { letter_id } = event {
                let id = u32::from(*letter_id);
                if !self.is_completed(id) {
                    self.mark_completed(id);
                    marked += 1;
                }
            }
        }
        marked
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryCompletionStore {
    completed: BTreeSet<u32>,
}

impl InMemoryCompletionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Ids in ascending order
    pub fn completed_ids(&self) -> Vec<u32> {
        self.completed.iter().copied().collect()
    }

    /// Share of the alphabet completed, 0-100
    pub fn total_progress_percent(&self) -> u8 {
        let done = self
            .completed
            .iter()
            .filter(|&&id| (1..=LETTER_COUNT as u32).contains(&id))
            .count();
        (done * 100 / LETTER_COUNT) as u8
    }

    pub fn reset(&mut self) {
        self.completed.clear();
    }
}

impl CompletionStore for InMemoryCompletionStore {
    fn mark_completed(&mut self, id: u32) {
        self.completed.insert(id);
    }

    fn is_completed(&self, id: u32) -> bool {
        self.completed.contains(&id)
    }
}
