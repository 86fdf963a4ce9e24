//! Integrity-policy parameters — fixed engine cadences plus the tunable
//! policy knobs supplied by configuration.
//!
//! The cadences are part of the verification contract and are therefore
//! named constants, not configuration. Policy choices that the engine
//! deliberately surfaces (liveness leniency, failure-lane symmetry,
//! auto-escalation) live in [`ProctorParams`].

use serde::{Deserialize, Serialize};

/// Interval between camera-scan sampling ticks.
pub const SCAN_CADENCE_MS: u64 = 150;

/// Scan progress gained per tick. 20 ticks reach 100%.
pub const SCAN_PROGRESS_INCREMENT: u8 = 5;

/// Duration of the microphone test window.
pub const MIC_TEST_DURATION_MS: u64 = 2500;

/// Cadence at which the audio level meter publishes samples
/// (display refresh rate, ~60 Hz).
pub const DISPLAY_CADENCE_MS: u64 = 16;

/// Camera liveness policy for the scan window.
///
/// The lenient single-frame policy is deliberate source behavior, carried
/// over as a named choice rather than an oversight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum LivenessPolicy {
    /// A single positive detection anywhere in the scan window verifies
    /// the camera lane.
    SingleFrame,
    /// Require at least `min_positive_ticks` positive detections across
    /// the scan window.
    SustainedPresence { min_positive_ticks: u32 },
}

impl LivenessPolicy {
    /// Whether `positive_ticks` detections satisfy this policy.
    pub fn satisfied_by(&self, positive_ticks: u32) -> bool {
        match self {
            Self::SingleFrame => positive_ticks >= 1,
            Self::SustainedPresence { min_positive_ticks } => {
                positive_ticks >= *min_positive_ticks
            }
        }
    }
}

impl Default for LivenessPolicy {
    fn default() -> Self {
        Self::SingleFrame
    }
}

/// What a failed microphone check does to the lane.
///
/// The source behavior is asymmetric: a failed camera scan lands on a
/// visible `Failed` state, while a failed microphone check returns the lane
/// directly to `Pending` with a reported reason. Both variants keep a
/// failed check re-attemptable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureLanePolicy {
    /// Return directly to `Pending` (source behavior, default).
    #[default]
    ResetToPending,
    /// Land on `Failed` like the camera lane; retry returns to `Pending`.
    TerminalFailed,
}

/// Tunable integrity-policy parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProctorParams {
    /// Loudness a microphone sample must strictly exceed at timer expiry.
    pub mic_threshold: f32,

    /// Camera liveness policy.
    pub liveness: LivenessPolicy,

    /// Microphone failure-lane policy.
    pub mic_failure_lane: FailureLanePolicy,

    /// Auto-escalate (e.g. force-submit) once the violation tally reaches
    /// this count. `None` disables auto-escalation.
    pub max_violations: Option<u32>,

    /// Whether the live session takes a fullscreen lock on entry.
    pub require_fullscreen: bool,

    /// Whether leaving fullscreen early raises a `FullscreenExit`
    /// violation. Off in the minimal policy.
    pub flag_fullscreen_exit: bool,
}

impl Default for ProctorParams {
    fn default() -> Self {
        Self {
            mic_threshold: 1.5,
            liveness: LivenessPolicy::SingleFrame,
            mic_failure_lane: FailureLanePolicy::ResetToPending,
            max_violations: Some(5),
            require_fullscreen: true,
            flag_fullscreen_exit: false,
        }
    }
}
