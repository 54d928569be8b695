//! Input vocabulary shared by the window layer and the scenes
//!
//! The window backend translates its native events into these types, so
//! scenes never see platform key codes.

/// A keyboard key the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Left,
    Right,
    Up,
    Down,
    F1,
    /// Top-row or keypad digit, `0..=9`.
    Digit(u8),
    /// Latin letter, always uppercase.
    Letter(char),
}

impl Key {
    /// Letter key, normalized to uppercase. Non-letters yield `None`.
    pub fn letter(c: char) -> Option<Self> {
        c.is_ascii_alphabetic()
            .then(|| Self::Letter(c.to_ascii_uppercase()))
    }

    pub fn digit(&self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(*d),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

impl KeyAction {
    /// Press or auto-repeat.
    pub fn is_down(self) -> bool {
        matches!(self, Self::Press | Self::Repeat)
    }
}

/// Modifier keys held while a key event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_are_uppercased() {
        assert_eq!(Key::letter('d'), Some(Key::Letter('D')));
        assert_eq!(Key::letter('Q'), Some(Key::Letter('Q')));
        assert_eq!(Key::letter('1'), None);
    }

    #[test]
    fn test_digit_accessor() {
        assert_eq!(Key::Digit(4).digit(), Some(4));
        assert_eq!(Key::Enter.digit(), None);
        assert!(KeyAction::Repeat.is_down());
        assert!(!KeyAction::Release.is_down());
    }
}
