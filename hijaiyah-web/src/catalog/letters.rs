//! The 28 Hijaiyah letters and their fathah forms
//!
//! `gesture` is the label the hand-sign model reports for the letter shape.
//! The fathah form is signed as the same shape followed by the diacritic
//! stroke.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Letter {
    /// 1-based position in the alphabet
    pub id: u8,
    pub arabic: &'static str,
    pub transliteration: &'static str,
    pub gesture: &'static str,
    pub fathah_arabic: &'static str,
    pub fathah_transliteration: &'static str,
}

const fn letter(
    id: u8,
    arabic: &'static str,
    transliteration: &'static str,
    gesture: &'static str,
    fathah_arabic: &'static str,
    fathah_transliteration: &'static str,
) -> Letter {
    Letter {
        id,
        arabic,
        transliteration,
        gesture,
        fathah_arabic,
        fathah_transliteration,
    }
}

pub const LETTER_COUNT: usize = 28;

pub static LETTERS: [Letter; LETTER_COUNT] = [
    letter(1, "ا", "Alif", "alif", "أَ", "A"),
    letter(2, "ب", "Ba", "ba", "بَ", "Ba"),
    letter(3, "ت", "Ta", "ta", "تَ", "Ta"),
    letter(4, "ث", "Tsa", "tsa", "ثَ", "Tsa"),
    letter(5, "ج", "Jim", "jim", "جَ", "Ja"),
    letter(6, "ح", "Ha", "ha", "حَ", "Ha"),
    letter(7, "خ", "Kha", "kha", "خَ", "Kha"),
    letter(8, "د", "Dal", "dal", "دَ", "Da"),
    letter(9, "ذ", "Dzal", "dzal", "ذَ", "Dza"),
    letter(10, "ر", "Ra", "ra", "رَ", "Ra"),
    letter(11, "ز", "Zai", "zai", "زَ", "Za"),
    letter(12, "س", "Sin", "sin", "سَ", "Sa"),
    letter(13, "ش", "Syin", "syin", "شَ", "Sya"),
    letter(14, "ص", "Shod", "shod", "صَ", "Sha"),
    letter(15, "ض", "Dhod", "dhod", "ضَ", "Dha"),
    letter(16, "ط", "Tho", "tho", "طَ", "Tha"),
    letter(17, "ظ", "Dzho", "dzho", "ظَ", "Dzha"),
    letter(18, "ع", "Ain", "ain", "عَ", "A"),
    letter(19, "غ", "Ghoin", "ghoin", "غَ", "Gha"),
    letter(20, "ف", "Fa", "fa", "فَ", "Fa"),
    letter(21, "ق", "Qof", "qof", "قَ", "Qa"),
    letter(22, "ك", "Kaf", "kaf", "كَ", "Ka"),
    letter(23, "ل", "Lam", "lam", "لَ", "La"),
    letter(24, "م", "Mim", "mim", "مَ", "Ma"),
    letter(25, "ن", "Nun", "nun", "نَ", "Na"),
    letter(26, "و", "Waw", "waw", "وَ", "Wa"),
    letter(27, "ه", "Ha", "ha_end", "هَ", "Ha"),
    letter(28, "ي", "Ya", "ya", "يَ", "Ya"),
];

/// Labels the model emits when it sees no known sign
const ABSENT_LABELS: [&str; 2] = ["unknown", "none"];

pub fn all_letters() -> &'static [Letter] {
    &LETTERS
}

pub fn find_by_id(id: u8) -> Option<&'static Letter> {
    LETTERS.iter().find(|l| l.id == id)
}

/// Matches either the bare or the fathah glyph
pub fn find_by_arabic(arabic: &str) -> Option<&'static Letter> {
    let arabic = arabic.trim();
    LETTERS
        .iter()
        .find(|l| l.arabic == arabic || l.fathah_arabic == arabic)
}

/// Case-insensitive; bare names win over fathah names
pub fn find_by_transliteration(name: &str) -> Option<&'static Letter> {
    let name = name.trim();
    LETTERS
        .iter()
        .find(|l| l.transliteration.eq_ignore_ascii_case(name))
        .or_else(|| {
            LETTERS
                .iter()
                .find(|l| l.fathah_transliteration.eq_ignore_ascii_case(name))
        })
}

pub fn find_by_gesture(label: &str) -> Option<&'static Letter> {
    let label = label.trim();
    LETTERS.iter().find(|l| l.gesture.eq_ignore_ascii_case(label))
}

/// Resolve whatever the page passed as a target: glyph, gesture label or
/// transliteration, in that order
pub fn resolve_target(target: &str) -> Option<&'static Letter> {
    find_by_arabic(target)
        .or_else(|| find_by_gesture(target))
        .or_else(|| find_by_transliteration(target))
}

/// Substring search over glyphs and names; blank query returns everything
pub fn search(query: &str) -> Vec<&'static Letter> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return LETTERS.iter().collect();
    }
    LETTERS
        .iter()
        .filter(|l| {
            l.arabic.contains(query.as_str())
                || l.fathah_arabic.contains(query.as_str())
                || l.transliteration.to_lowercase().contains(&query)
                || l.gesture.contains(query.as_str())
        })
        .collect()
}

/// Empty, "Unknown" and "None" all mean the model saw no sign
pub fn is_absent_label(label: &str) -> bool {
    let label = label.trim();
    label.is_empty() || ABSENT_LABELS.iter().any(|a| a.eq_ignore_ascii_case(label))
}

/// Case-insensitive label comparison; an absent label never matches
pub fn labels_match(detected: &str, expected: &str) -> bool {
    !is_absent_label(detected) && detected.trim().eq_ignore_ascii_case(expected.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_complete_and_ordered() {
        assert_eq!(all_letters().len(), 28);
        for (i, l) in all_letters().iter().enumerate() {
            assert_eq!(l.id as usize, i + 1);
        }
    }

    #[test]
    fn test_lookup_by_glyph() {
        assert_eq!(find_by_arabic("ب").map(|l| l.gesture), Some("ba"));
        assert_eq!(find_by_arabic("بَ").map(|l| l.id), Some(2));
        assert!(find_by_arabic("x").is_none());
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(find_by_transliteration("alif").map(|l| l.id), Some(1));
        // Fathah-only spelling
        assert_eq!(find_by_transliteration("Ja").map(|l| l.id), Some(5));
        assert_eq!(find_by_gesture("HA_END").map(|l| l.id), Some(27));
        assert_eq!(find_by_id(28).map(|l| l.transliteration), Some("Ya"));
        assert!(find_by_id(0).is_none());
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("ت").map(|l| l.id), Some(3));
        assert_eq!(resolve_target("dzho").map(|l| l.id), Some(17));
        assert_eq!(resolve_target("Shod").map(|l| l.id), Some(14));
        assert!(resolve_target("zzz").is_none());
    }

    #[test]
    fn test_search() {
        assert_eq!(search("").len(), 28);
        let hits: Vec<u8> = search("dz").iter().map(|l| l.id).collect();
        assert_eq!(hits, vec![9, 17]);
    }

    #[test]
    fn test_label_matching() {
        assert!(labels_match("BA", "ba"));
        assert!(labels_match(" ba ", "ba"));
        assert!(!labels_match("ta", "ba"));
        assert!(!labels_match("", ""));
        assert!(!labels_match("Unknown", "unknown"));
        assert!(is_absent_label("None"));
        assert!(!is_absent_label("alif"));
    }
}
