//! Verification state tracking.

use serde::{Deserialize, Serialize};
use vigil_types::{CheckState, Timestamp};

/// Snapshot of both certification lanes, consumed by the session gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationState {
    pub camera: CheckState,
    pub microphone: CheckState,
}

impl VerificationState {
    /// Whether every lane has passed certification.
    pub fn all_verified(&self) -> bool {
        self.camera.is_verified() && self.microphone.is_verified()
    }
}

/// An in-progress camera scan.
///
/// Exists only while the camera lane is `Testing`; destroyed on completion
/// or cancellation. The epoch identifies the scan so that callbacks from a
/// cancelled scan are rejected without mutating state.
#[derive(Clone, Debug)]
pub struct ScanSession {
    progress_percent: u8,
    positive_ticks: u32,
    face_seen: bool,
    started_at: Timestamp,
    epoch: u64,
}

impl ScanSession {
    pub(crate) fn new(started_at: Timestamp, epoch: u64) -> Self {
        Self {
            progress_percent: 0,
            positive_ticks: 0,
            face_seen: false,
            started_at,
            epoch,
        }
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// Number of ticks that reported a positive detection.
    pub fn positive_ticks(&self) -> u32 {
        self.positive_ticks
    }

    /// Whether any tick in this scan saw a face. Sticky — subsequent
    /// negative ticks do not reset it.
    pub fn face_seen(&self) -> bool {
        self.face_seen
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn advance(&mut self, increment: u8, detected: bool) {
        self.progress_percent = self.progress_percent.saturating_add(increment).min(100);
        if detected {
            self.positive_ticks += 1;
            self.face_seen = true;
        }
    }

    pub(crate) fn complete(&self) -> bool {
        self.progress_percent >= 100
    }
}
