//! Microphone loudness samples.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instantaneous microphone signal energy, bounded to `[0, 255]`.
///
/// The bound comes from the audio analyser: levels are averages over 8-bit
/// frequency bins. Samples carry most-recent-value semantics — they are
/// displayed live and consumed at microphone-test expiry, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct LoudnessSample(f32);

impl LoudnessSample {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 255.0;

    /// A silent sample.
    pub const SILENCE: Self = Self(0.0);

    /// Create a sample, clamping into `[0, 255]`.
    pub fn new(level: f32) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Whether this sample is strictly above the given threshold.
    pub fn exceeds(&self, threshold: f32) -> bool {
        self.0 > threshold
    }
}

impl fmt::Display for LoudnessSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
