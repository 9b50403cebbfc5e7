//! Pattern search over the tail of a movement history

use super::direction::Movement;
use super::history::MovementHistory;

/// Entries at the end of the history considered by `contains_pattern`
pub const PATTERN_WINDOWS: [usize; 2] = [3, 2];

/// True when `pattern` appears as a contiguous run inside the last three
/// (or last two) entries. An empty pattern never matches.
pub fn contains_pattern(history: &MovementHistory, pattern: &[Movement]) -> bool {
    if pattern.is_empty() {
        return false;
    }
    PATTERN_WINDOWS
        .iter()
        .any(|&n| contains_subsequence(&history.tail(n), pattern))
}

/// Contiguous subsequence search
pub fn contains_subsequence(haystack: &[Movement], needle: &[Movement]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}
