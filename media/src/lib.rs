//! Capture devices and media-derived signals.
//!
//! Three seams between the engine and the host environment live here:
//! - [`MediaAcquirer`] — requesting camera/microphone access,
//! - [`LivenessDetector`] — per-frame face presence,
//! - [`AudioLevelMeter`] — continuous loudness sampling.
//!
//! The engine never talks to hardware directly; device backends implement
//! these traits. [`MediaHandle`] owns the live tracks and stops them on
//! every exit path.

pub mod acquirer;
pub mod error;
pub mod handle;
pub mod liveness;
pub mod meter;

pub use acquirer::{MediaAcquirer, MediaConstraints};
pub use error::MediaError;
pub use handle::{AudioSource, FrameSource, MediaHandle};
pub use liveness::{FaceDetection, LivenessDetector, ModelLoader, ModelManifest, VideoFrame};
pub use meter::AudioLevelMeter;
