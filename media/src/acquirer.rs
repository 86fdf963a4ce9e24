//! Device acquisition seam.

use crate::error::MediaError;
use crate::handle::MediaHandle;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which faculties to request from the device backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

impl MediaConstraints {
    /// Camera and microphone together — the pre-exam verification request.
    pub const AUDIO_VIDEO: Self = Self {
        video: true,
        audio: true,
    };

    /// Camera only — the live-session proctoring overlay.
    pub const VIDEO_ONLY: Self = Self {
        video: true,
        audio: false,
    };
}

/// Requests camera/microphone access from the host environment.
///
/// `acquire` prompts the user for device permission exactly once per call.
/// It is safe to call repeatedly (e.g. retry after failure) without leaking
/// previously acquired devices: a [`MediaHandle`] not adopted by the caller
/// stops its tracks when dropped.
#[async_trait]
pub trait MediaAcquirer: Send + Sync {
    async fn acquire(&self, constraints: MediaConstraints) -> Result<MediaHandle, MediaError>;
}
