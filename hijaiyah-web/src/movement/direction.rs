//! Movement directions
//!
//! Screen convention: +x is right, +y is down, so "up" means dy < 0.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Movement {
    Static,
    Left,
    Right,
    Up,
    Down,
    DiagUpLeft,
    DiagUpRight,
    DiagDownLeft,
    DiagDownRight,
    #[default]
    Unknown,
}

impl Movement {
    /// All variants, Unknown last
    pub const ALL: [Movement; 10] = [
        Movement::Static,
        Movement::Left,
        Movement::Right,
        Movement::Up,
        Movement::Down,
        Movement::DiagUpLeft,
        Movement::DiagUpRight,
        Movement::DiagDownLeft,
        Movement::DiagDownRight,
        Movement::Unknown,
    ];

    /// Arrow shown in the debug overlay
    pub fn symbol(self) -> &'static str {
        match self {
            Movement::Static => "●",
            Movement::Left => "←",
            Movement::Right => "→",
            Movement::Up => "↑",
            Movement::Down => "↓",
            Movement::DiagUpLeft => "↖",
            Movement::DiagUpRight => "↗",
            Movement::DiagDownLeft => "↙",
            Movement::DiagDownRight => "↘",
            Movement::Unknown => "?",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Movement::Static => "STATIC",
            Movement::Left => "LEFT",
            Movement::Right => "RIGHT",
            Movement::Up => "UP",
            Movement::Down => "DOWN",
            Movement::DiagUpLeft => "DIAG_UP_LEFT",
            Movement::DiagUpRight => "DIAG_UP_RIGHT",
            Movement::DiagDownLeft => "DIAG_DOWN_LEFT",
            Movement::DiagDownRight => "DIAG_DOWN_RIGHT",
            Movement::Unknown => "UNKNOWN",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Movement> {
        Movement::ALL.into_iter().find(|m| m.symbol() == symbol.trim())
    }

    /// Case-insensitive; accepts the long `DIAGONAL_` spelling too
    pub fn from_name(name: &str) -> Option<Movement> {
        let upper = name.trim().to_ascii_uppercase();
        let canonical = upper.replacen("DIAGONAL_", "DIAG_", 1);
        Movement::ALL.into_iter().find(|m| m.name() == canonical)
    }

    /// Direction pointing the opposite way; Static and Unknown map to themselves
    pub fn antipode(self) -> Movement {
        match self {
            Movement::Left => Movement::Right,
            Movement::Right => Movement::Left,
            Movement::Up => Movement::Down,
            Movement::Down => Movement::Up,
            Movement::DiagUpLeft => Movement::DiagDownRight,
            Movement::DiagDownRight => Movement::DiagUpLeft,
            Movement::DiagUpRight => Movement::DiagDownLeft,
            Movement::DiagDownLeft => Movement::DiagUpRight,
            other => other,
        }
    }

    pub fn is_static(self) -> bool {
        self == Movement::Static
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_and_name_parse_back() {
        for m in Movement::ALL {
            assert_eq!(Movement::from_symbol(m.symbol()), Some(m));
            assert_eq!(Movement::from_name(m.name()), Some(m));
        }
    }

    #[test]
    fn test_name_parsing_is_lenient() {
        assert_eq!(Movement::from_name("static"), Some(Movement::Static));
        assert_eq!(Movement::from_name("DIAGONAL_UP_LEFT"), Some(Movement::DiagUpLeft));
        assert_eq!(Movement::from_name("sideways"), None);
        assert_eq!(Movement::from_symbol("x"), None);
    }

    #[test]
    fn test_antipode_is_involution() {
        for m in Movement::ALL {
            assert_eq!(m.antipode().antipode(), m);
        }
        assert_eq!(Movement::DiagUpRight.antipode(), Movement::DiagDownLeft);
    }

    #[test]
    fn test_serde_uses_upper_case_names() {
        let json = serde_json::to_string(&Movement::DiagDownRight).unwrap();
        assert_eq!(json, "\"DIAG_DOWN_RIGHT\"");
        let back: Movement = serde_json::from_str("\"LEFT\"").unwrap();
        assert_eq!(back, Movement::Left);
    }
}
