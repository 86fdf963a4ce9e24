//! The session gate — pure decision functions, no hidden state.

use serde::{Deserialize, Serialize};
use vigil_verification::VerificationState;

/// Whether the assessment may start: both lanes `Verified`, nothing less.
/// No partial start is permitted.
pub fn can_start(verification: &VerificationState) -> bool {
    verification.all_verified()
}

/// Externally supplied integrity policy. The gate mechanism never
/// hard-codes a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    /// Auto-escalate (e.g. force-submit) at this violation count;
    /// `None` disables auto-escalation.
    pub max_violations: Option<u32>,
}

impl EscalationPolicy {
    pub fn disabled() -> Self {
        Self {
            max_violations: None,
        }
    }
}

/// Whether the tally has reached the policy's escalation threshold.
pub fn should_auto_escalate(tally: u32, policy: &EscalationPolicy) -> bool {
    policy.max_violations.is_some_and(|max| tally >= max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_types::CheckState;

    fn state(camera: CheckState, microphone: CheckState) -> VerificationState {
        VerificationState { camera, microphone }
    }

    #[test]
    fn gate_opens_only_when_both_lanes_verified() {
        use CheckState::{Pending, Verified};

        assert!(!can_start(&state(Pending, Pending)));
        assert!(!can_start(&state(Verified, Pending)));
        assert!(!can_start(&state(Pending, Verified)));
        assert!(can_start(&state(Verified, Verified)));
    }

    #[test]
    fn gate_stays_closed_during_testing_and_after_failure() {
        use CheckState::{Failed, Testing, Verified};

        assert!(!can_start(&state(Testing, Verified)));
        assert!(!can_start(&state(Failed, Verified)));
    }

    #[test]
    fn escalation_threshold_is_policy_driven() {
        let policy = EscalationPolicy {
            max_violations: Some(5),
        };
        assert!(!should_auto_escalate(4, &policy));
        assert!(should_auto_escalate(5, &policy));
        assert!(should_auto_escalate(9, &policy));
    }

    #[test]
    fn escalation_disabled_never_fires() {
        let policy = EscalationPolicy::disabled();
        assert!(!should_auto_escalate(u32::MAX, &policy));
    }
}
