//! Nullable liveness detector — scripted per-tick detections.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use vigil_media::{FaceDetection, LivenessDetector, MediaError, ModelLoader, ModelManifest, VideoFrame};

enum Mode {
    Never,
    Always,
    PositiveAt(HashSet<u32>),
}

/// Answers each `detect` call from a script.
///
/// Calls are counted 1-based, matching scan tick numbers.
pub struct NullDetector {
    mode: Mode,
    calls: Mutex<u32>,
}

impl NullDetector {
    /// Never detects a face.
    pub fn never() -> Self {
        Self {
            mode: Mode::Never,
            calls: Mutex::new(0),
        }
    }

    /// Detects a face on every call.
    pub fn always() -> Self {
        Self {
            mode: Mode::Always,
            calls: Mutex::new(0),
        }
    }

    /// Detects a face only on the given (1-based) call numbers.
    pub fn positive_at(ticks: &[u32]) -> Self {
        Self {
            mode: Mode::PositiveAt(ticks.iter().copied().collect()),
            calls: Mutex::new(0),
        }
    }

    /// Total `detect` calls so far.
    pub fn calls(&self) -> u32 {
        *self.calls.lock().expect("call counter lock poisoned")
    }
}

impl LivenessDetector for NullDetector {
    fn name(&self) -> &str {
        "null-detector"
    }

    fn detect(&self, _frame: &VideoFrame) -> Option<FaceDetection> {
        let mut calls = self.calls.lock().expect("call counter lock poisoned");
        *calls += 1;
        let positive = match &self.mode {
            Mode::Never => false,
            Mode::Always => true,
            Mode::PositiveAt(ticks) => ticks.contains(&*calls),
        };
        positive.then_some(FaceDetection { confidence: 0.92 })
    }
}

enum LoadBehavior {
    Ready(Arc<NullDetector>),
    Failing,
}

/// A model loader that resolves instantly.
pub struct NullModelLoader {
    behavior: LoadBehavior,
}

impl NullModelLoader {
    /// Loads successfully, yielding the given detector.
    pub fn ready(detector: NullDetector) -> Self {
        Self {
            behavior: LoadBehavior::Ready(Arc::new(detector)),
        }
    }

    /// Every load fails with `ModelUnavailable`.
    pub fn failing() -> Self {
        Self {
            behavior: LoadBehavior::Failing,
        }
    }
}

#[async_trait]
impl ModelLoader for NullModelLoader {
    async fn load(
        &self,
        manifest: &ModelManifest,
    ) -> Result<Arc<dyn LivenessDetector>, MediaError> {
        match &self.behavior {
            LoadBehavior::Ready(detector) => Ok(Arc::clone(detector) as Arc<dyn LivenessDetector>),
            LoadBehavior::Failing => Err(MediaError::ModelUnavailable(format!(
                "artifacts missing at {}",
                manifest.base_url
            ))),
        }
    }
}
