//! Nullable media device — deterministic camera/microphone capture.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vigil_media::{
    AudioSource, FrameSource, MediaAcquirer, MediaConstraints, MediaError, MediaHandle, VideoFrame,
};
use vigil_types::{LoudnessSample, Timestamp};

enum Outcome {
    Grant,
    Deny,
    Unavailable,
}

/// A scripted device backend.
///
/// Grants or refuses access deterministically, counts permission prompts,
/// and tracks how many issued handles are still live — releasing a handle
/// (explicitly or by drop) decrements the count, which lets tests assert
/// that no exit path leaks tracks.
pub struct NullMediaDevice {
    outcome: Outcome,
    level: Arc<Mutex<f32>>,
    analysis_supported: bool,
    acquires: AtomicUsize,
    live: Arc<AtomicUsize>,
}

impl NullMediaDevice {
    /// Grants every request. Audio starts silent; drive it via
    /// [`audio_level_control`](Self::audio_level_control).
    pub fn granting() -> Self {
        Self {
            outcome: Outcome::Grant,
            level: Arc::new(Mutex::new(0.0)),
            analysis_supported: true,
            acquires: AtomicUsize::new(0),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Denies every request (`PermissionDenied`).
    pub fn denying() -> Self {
        Self {
            outcome: Outcome::Deny,
            ..Self::granting()
        }
    }

    /// No device present (`DeviceUnavailable`).
    pub fn unavailable() -> Self {
        Self {
            outcome: Outcome::Unavailable,
            ..Self::granting()
        }
    }

    /// Grants access, but the audio track refuses analyser construction —
    /// the level meter must fail closed.
    pub fn without_audio_analysis() -> Self {
        Self {
            analysis_supported: false,
            ..Self::granting()
        }
    }

    /// A handle for setting the instantaneous loudness level seen by every
    /// issued audio track.
    pub fn audio_level_control(&self) -> AudioLevelControl {
        AudioLevelControl {
            level: Arc::clone(&self.level),
        }
    }

    /// How many times `acquire` was called (= permission prompts shown).
    pub fn acquire_count(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    /// How many issued handles have not yet been released.
    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaAcquirer for NullMediaDevice {
    async fn acquire(&self, constraints: MediaConstraints) -> Result<MediaHandle, MediaError> {
        self.acquires.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            Outcome::Deny => Err(MediaError::PermissionDenied),
            Outcome::Unavailable => {
                Err(MediaError::DeviceUnavailable("null device disabled".into()))
            }
            Outcome::Grant => {
                self.live.fetch_add(1, Ordering::SeqCst);
                let mut guard = Some(LiveGuard {
                    live: Arc::clone(&self.live),
                });

                let video: Option<Box<dyn FrameSource>> = if constraints.video {
                    Some(Box::new(NullFrameSource {
                        _guard: guard.take(),
                    }))
                } else {
                    None
                };
                let audio: Option<Box<dyn AudioSource>> = if constraints.audio {
                    Some(Box::new(NullAudioSource {
                        level: Arc::clone(&self.level),
                        supported: self.analysis_supported,
                        _guard: guard.take(),
                    }))
                } else {
                    None
                };
                Ok(MediaHandle::new(video, audio))
            }
        }
    }
}

/// Sets the loudness level reported by a [`NullMediaDevice`]'s audio
/// tracks.
#[derive(Clone)]
pub struct AudioLevelControl {
    level: Arc<Mutex<f32>>,
}

impl AudioLevelControl {
    pub fn set(&self, level: f32) {
        *self.level.lock().expect("level lock poisoned") = level;
    }
}

/// Decrements the device's live-handle counter when the handle's tracks
/// are dropped.
struct LiveGuard {
    live: Arc<AtomicUsize>,
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

struct NullFrameSource {
    _guard: Option<LiveGuard>,
}

impl FrameSource for NullFrameSource {
    fn current_frame(&mut self) -> Option<VideoFrame> {
        Some(VideoFrame::new(640, 480, Timestamp::now()))
    }
}

struct NullAudioSource {
    level: Arc<Mutex<f32>>,
    supported: bool,
    _guard: Option<LiveGuard>,
}

impl AudioSource for NullAudioSource {
    fn sample_level(&mut self) -> Option<LoudnessSample> {
        Some(LoudnessSample::new(
            *self.level.lock().expect("level lock poisoned"),
        ))
    }

    fn supports_analysis(&self) -> bool {
        self.supported
    }
}
