//! Violation events recorded during a live exam session.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of an environment anomaly observed during the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// The page became hidden (candidate switched tabs).
    TabSwitch,
    /// The window lost input focus.
    FocusLost,
    /// A forbidden key combination was pressed.
    RestrictedKey,
    /// The session left fullscreen before it ended.
    FullscreenExit,
}

impl ViolationKind {
    /// The human-readable warning shown for this violation.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::TabSwitch => "Tab switching detected!",
            Self::FocusLost => "Window focus lost!",
            Self::RestrictedKey => "Restricted key pressed!",
            Self::FullscreenExit => "Fullscreen exited!",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TabSwitch => write!(f, "tab_switch"),
            Self::FocusLost => write!(f, "focus_lost"),
            Self::RestrictedKey => write!(f, "restricted_key"),
            Self::FullscreenExit => write!(f, "fullscreen_exit"),
        }
    }
}

/// A single recorded violation. Append-only — never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationEvent {
    pub kind: ViolationKind,
    pub timestamp: Timestamp,
    pub message: String,
}

impl ViolationEvent {
    /// Create an event carrying the kind's default warning message.
    pub fn new(kind: ViolationKind, timestamp: Timestamp) -> Self {
        Self {
            kind,
            timestamp,
            message: kind.default_message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_carries_default_message() {
        let event = ViolationEvent::new(ViolationKind::TabSwitch, Timestamp::new(10));
        assert_eq!(event.message, "Tab switching detected!");
        assert_eq!(event.kind, ViolationKind::TabSwitch);
        assert_eq!(event.timestamp, Timestamp::new(10));
    }
}
