//! Restricted key combination matching.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ctrl-modified keys that are forbidden during a live session:
/// copy, paste, cut, print, save, view-source, devtools.
const RESTRICTED_CTRL_KEYS: [&str; 7] = ["c", "v", "x", "p", "s", "u", "i"];

/// A pressed key plus its modifier state, as reported by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCombo {
    pub key: String,
    pub ctrl: bool,
}

impl KeyCombo {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }

    /// A key press with no modifier.
    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, false)
    }

    /// A Ctrl-modified key press.
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self::new(key, true)
    }

    /// Whether this combination is forbidden during a live session:
    /// PrintScreen, or Ctrl+{c,v,x,p,s,u,i} (case-insensitive).
    pub fn is_restricted(&self) -> bool {
        if self.key == "PrintScreen" {
            return true;
        }
        self.ctrl
            && RESTRICTED_CTRL_KEYS
                .iter()
                .any(|k| self.key.eq_ignore_ascii_case(k))
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+{}", self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_screen_is_restricted_without_ctrl() {
        assert!(KeyCombo::plain("PrintScreen").is_restricted());
    }

    #[test]
    fn ctrl_combinations_are_restricted_case_insensitively() {
        for key in ["c", "v", "x", "p", "s", "u", "i"] {
            assert!(KeyCombo::ctrl(key).is_restricted(), "Ctrl+{key}");
            assert!(
                KeyCombo::ctrl(key.to_uppercase()).is_restricted(),
                "Ctrl+{}",
                key.to_uppercase()
            );
        }
    }

    #[test]
    fn unmodified_letters_are_allowed() {
        assert!(!KeyCombo::plain("c").is_restricted());
        assert!(!KeyCombo::plain("p").is_restricted());
    }

    #[test]
    fn other_ctrl_combinations_are_allowed() {
        assert!(!KeyCombo::ctrl("a").is_restricted());
        assert!(!KeyCombo::ctrl("z").is_restricted());
    }
}
