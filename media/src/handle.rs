//! The media handle — exclusive ownership of live capture tracks.

use crate::liveness::VideoFrame;
use std::sync::{Arc, Mutex, MutexGuard};
use vigil_types::LoudnessSample;

/// A source of camera frames for one live video track.
pub trait FrameSource: Send {
    /// The most recent frame, or `None` once the track has stopped.
    fn current_frame(&mut self) -> Option<VideoFrame>;
}

/// A source of instantaneous loudness levels for one live audio track.
pub trait AudioSource: Send {
    /// Instantaneous signal energy, or `None` once the track has stopped.
    fn sample_level(&mut self) -> Option<LoudnessSample>;

    /// Whether an analyser graph can be constructed for this track.
    /// Environments without analysis support fail the level meter closed.
    fn supports_analysis(&self) -> bool {
        true
    }
}

struct Tracks {
    video: Option<Box<dyn FrameSource>>,
    audio: Option<Box<dyn AudioSource>>,
    stopped: bool,
}

/// Opaque reference to an active audio+video capture.
///
/// Exclusively owned: by the verification flow until session start, then by
/// the live session. Not `Clone` — at most one active handle per client
/// session. Tracks are stopped on [`stop`](MediaHandle::stop) or on drop,
/// so every exit path releases the underlying devices.
pub struct MediaHandle {
    tracks: Arc<Mutex<Tracks>>,
}

impl MediaHandle {
    pub fn new(
        video: Option<Box<dyn FrameSource>>,
        audio: Option<Box<dyn AudioSource>>,
    ) -> Self {
        Self {
            tracks: Arc::new(Mutex::new(Tracks {
                video,
                audio,
                stopped: false,
            })),
        }
    }

    pub fn has_video(&self) -> bool {
        self.lock().video.is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.lock().audio.is_some()
    }

    /// Whether the tracks have been stopped.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// The current video frame, or `None` when there is no live video track.
    pub fn current_frame(&self) -> Option<VideoFrame> {
        let mut tracks = self.lock();
        if tracks.stopped {
            return None;
        }
        tracks.video.as_mut().and_then(|v| v.current_frame())
    }

    /// Whether the audio track supports analyser construction.
    pub fn supports_audio_analysis(&self) -> bool {
        let tracks = self.lock();
        !tracks.stopped
            && tracks
                .audio
                .as_ref()
                .is_some_and(|a| a.supports_analysis())
    }

    /// Stop all tracks. Idempotent.
    pub fn stop(&self) {
        let mut tracks = self.lock();
        if tracks.stopped {
            return;
        }
        tracks.stopped = true;
        tracks.video = None;
        tracks.audio = None;
        tracing::debug!("media tracks stopped");
    }

    /// A shared tap on the audio track, used by the level meter. The tap
    /// observes [`stop`](MediaHandle::stop): once the handle is released it
    /// yields `None`.
    pub fn audio_tap(&self) -> AudioTap {
        AudioTap {
            tracks: Arc::clone(&self.tracks),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tracks> {
        self.tracks.lock().expect("media track lock poisoned")
    }
}

impl Drop for MediaHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Shared read access to the audio track for background sampling.
pub struct AudioTap {
    tracks: Arc<Mutex<Tracks>>,
}

impl AudioTap {
    /// Instantaneous level, or `None` once the handle has been released.
    pub fn sample_level(&self) -> Option<LoudnessSample> {
        let mut tracks = self.tracks.lock().expect("media track lock poisoned");
        if tracks.stopped {
            return None;
        }
        tracks.audio.as_mut().and_then(|a| a.sample_level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticAudio(f32);

    impl AudioSource for StaticAudio {
        fn sample_level(&mut self) -> Option<LoudnessSample> {
            Some(LoudnessSample::new(self.0))
        }
    }

    struct OneFrame;

    impl FrameSource for OneFrame {
        fn current_frame(&mut self) -> Option<VideoFrame> {
            Some(VideoFrame::new(640, 480, vigil_types::Timestamp::new(0)))
        }
    }

    #[test]
    fn stop_is_idempotent_and_releases_tracks() {
        let handle = MediaHandle::new(Some(Box::new(OneFrame)), Some(Box::new(StaticAudio(7.0))));
        assert!(handle.has_video());
        assert!(handle.has_audio());

        handle.stop();
        handle.stop();

        assert!(handle.is_stopped());
        assert!(!handle.has_video());
        assert!(handle.current_frame().is_none());
    }

    #[test]
    fn tap_observes_release() {
        let handle = MediaHandle::new(None, Some(Box::new(StaticAudio(3.0))));
        let tap = handle.audio_tap();
        assert_eq!(tap.sample_level(), Some(LoudnessSample::new(3.0)));

        handle.stop();
        assert_eq!(tap.sample_level(), None);
    }

    #[test]
    fn drop_stops_tracks() {
        let handle = MediaHandle::new(None, Some(Box::new(StaticAudio(3.0))));
        let tap = handle.audio_tap();
        drop(handle);
        assert_eq!(tap.sample_level(), None);
    }
}
