//! Per-faculty check states for the pre-exam hardware certification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A hardware faculty that must be certified before the assessment starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faculty {
    Camera,
    Microphone,
}

impl fmt::Display for Faculty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera => write!(f, "camera"),
            Self::Microphone => write!(f, "microphone"),
        }
    }
}

/// The certification state of a single faculty.
///
/// Mutated only by the verification state machine. `Verified` is reachable
/// only from `Testing`; `Failed` is recoverable — an explicit retry returns
/// the lane to `Pending`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckState {
    /// Not yet tested, or reset after a failed attempt.
    Pending,
    /// A test is currently running.
    Testing,
    /// The faculty passed its check.
    Verified,
    /// The faculty failed its check; retry returns to `Pending`.
    Failed,
}

impl CheckState {
    /// Whether a new test may begin from this state.
    pub fn can_begin_test(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether this faculty has passed certification.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Whether an explicit retry affordance should be offered.
    pub fn needs_retry(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Testing => write!(f, "testing"),
            Self::Verified => write!(f, "verified"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_can_begin() {
        assert!(CheckState::Pending.can_begin_test());
        assert!(!CheckState::Testing.can_begin_test());
        assert!(!CheckState::Verified.can_begin_test());
        assert!(!CheckState::Failed.can_begin_test());
    }

    #[test]
    fn retry_offered_only_after_failure() {
        assert!(CheckState::Failed.needs_retry());
        assert!(!CheckState::Pending.needs_retry());
        assert!(!CheckState::Verified.needs_retry());
    }
}
