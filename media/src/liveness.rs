//! Liveness detection seam and model loading.
//!
//! The engine does not specify HOW face presence is decided — only that a
//! detector answers per frame. Different detector backends can be plugged
//! in behind [`LivenessDetector`].

use crate::error::MediaError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vigil_types::Timestamp;

/// One captured camera frame.
///
/// Opaque to the engine; detector backends interpret the pixel data.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    width: u32,
    height: u32,
    captured_at: Timestamp,
    data: Arc<[u8]>,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, captured_at: Timestamp) -> Self {
        Self {
            width,
            height,
            captured_at,
            data: Arc::from(Vec::new().into_boxed_slice()),
        }
    }

    pub fn with_data(width: u32, height: u32, captured_at: Timestamp, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            captured_at,
            data: Arc::from(data.into_boxed_slice()),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn captured_at(&self) -> Timestamp {
        self.captured_at
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A positive face detection for a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceDetection {
    /// Detector confidence in `[0.0, 1.0]`.
    pub confidence: f32,
}

/// Per-frame face presence.
///
/// Implementations must settle within the scan cadence; the scan driver
/// treats a slow or absent result as "no detection this tick" and never
/// queues frames (drop, never queue). Pure with respect to engine state —
/// scan progress and the sticky seen-flag live in the state machine.
pub trait LivenessDetector: Send + Sync {
    /// Human-readable name of the detector backend.
    fn name(&self) -> &str;

    /// Detect a face in the given frame, or `None`.
    fn detect(&self, frame: &VideoFrame) -> Option<FaceDetection>;
}

/// An external, versioned liveness model artifact set.
///
/// The original deployment loads two nets (a face detector and a landmark
/// net) from one versioned base URL; the manifest generalizes that.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelManifest {
    pub base_url: String,
    pub version: String,
    pub artifacts: Vec<String>,
}

impl ModelManifest {
    /// Fully qualified URLs for every artifact in the manifest.
    pub fn artifact_urls(&self) -> Vec<String> {
        self.artifacts
            .iter()
            .map(|a| format!("{}/{}", self.base_url.trim_end_matches('/'), a))
            .collect()
    }
}

/// Loads the liveness model asynchronously.
///
/// Until a load succeeds, camera checks are blocked with `ModelNotReady`.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, manifest: &ModelManifest) -> Result<Arc<dyn LivenessDetector>, MediaError>;
}
