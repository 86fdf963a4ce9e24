//! Async verification drivers — the cadenced loops around the pure state
//! machine.
//!
//! A [`VerificationSession`] owns the media handle from acquisition until
//! either abandonment (handle released) or session start (ownership
//! transferred to the live session). Scan ticks are strictly sequential:
//! tick n+1 is not issued until tick n's detector call has settled.

use crate::cancel::{wait_cancelled, Canceller};
use crate::error::VerificationError;
use crate::machine::{
    MicOutcome, MicRejection, ScanTick, VerificationEvent, VerificationStateMachine,
};
use crate::state::VerificationState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use vigil_media::{
    AudioLevelMeter, LivenessDetector, MediaAcquirer, MediaConstraints, MediaError, MediaHandle,
    ModelLoader, ModelManifest,
};
use vigil_types::{
    params::{MIC_TEST_DURATION_MS, SCAN_CADENCE_MS},
    LoudnessSample, ProctorParams, Timestamp,
};

/// One candidate's pre-exam verification flow.
pub struct VerificationSession {
    machine: VerificationStateMachine,
    media: Option<MediaHandle>,
    meter: Option<AudioLevelMeter>,
    detector: Option<Arc<dyn LivenessDetector>>,
    cancel: Arc<watch::Sender<bool>>,
    progress: watch::Sender<u8>,
}

impl VerificationSession {
    pub fn new(params: ProctorParams) -> Self {
        let (cancel, _) = watch::channel(false);
        let (progress, _) = watch::channel(0);
        Self {
            machine: VerificationStateMachine::new(params),
            media: None,
            meter: None,
            detector: None,
            cancel: Arc::new(cancel),
            progress,
        }
    }

    /// A handle that cancels this flow from elsewhere (e.g. a navigation
    /// handler).
    pub fn canceller(&self) -> Canceller {
        Canceller::new(Arc::clone(&self.cancel))
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Snapshot of both lanes for the session gate.
    pub fn snapshot(&self) -> VerificationState {
        self.machine.snapshot()
    }

    pub fn machine(&self) -> &VerificationStateMachine {
        &self.machine
    }

    /// Drain pending state machine events for the embedding application.
    pub fn drain_events(&mut self) -> Vec<VerificationEvent> {
        self.machine.drain_events()
    }

    /// Live scan progress for the scanning overlay.
    pub fn progress_watch(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    /// Live loudness samples for the level display, when the meter is up.
    pub fn level_watch(&self) -> Option<watch::Receiver<Option<LoudnessSample>>> {
        self.meter.as_ref().map(|m| m.subscribe())
    }

    /// Request camera + microphone access.
    ///
    /// Safe to call repeatedly after failure: any previously held handle is
    /// released first, so retries never leak tracks. On failure the camera
    /// lane fails immediately with a retry affordance.
    pub async fn acquire_media(
        &mut self,
        acquirer: &dyn MediaAcquirer,
    ) -> Result<(), VerificationError> {
        if self.is_cancelled() {
            return Err(VerificationError::Cancelled);
        }
        self.release_media();

        match acquirer.acquire(MediaConstraints::AUDIO_VIDEO).await {
            Ok(handle) => {
                if self.is_cancelled() {
                    // Cancelled while the permission prompt was open.
                    handle.stop();
                    return Err(VerificationError::Cancelled);
                }
                self.meter = match AudioLevelMeter::start(&handle) {
                    Ok(meter) => Some(meter),
                    Err(err) => {
                        tracing::warn!(%err, "audio level meter unavailable");
                        None
                    }
                };
                self.media = Some(handle);
                tracing::info!("media acquired");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "device acquisition failed");
                self.machine.record_acquisition_failure();
                Err(err.into())
            }
        }
    }

    /// Load the liveness model. Until this succeeds, camera checks fail
    /// with `ModelNotReady`; microphone testing is unaffected.
    pub async fn load_model(
        &mut self,
        loader: &dyn ModelLoader,
        manifest: &ModelManifest,
    ) -> Result<(), VerificationError> {
        let detector = loader.load(manifest).await?;
        tracing::info!(
            detector = detector.name(),
            version = %manifest.version,
            "liveness model loaded"
        );
        self.detector = Some(detector);
        self.machine.set_model_ready();
        Ok(())
    }

    /// Run the camera scan to completion.
    ///
    /// 150 ms cadence, +5 progress per tick; a single positive detection
    /// anywhere in the window verifies the lane under the default policy.
    /// A failed scan leaves the lane `Failed` with progress reset — retry
    /// via [`retry_camera`](Self::retry_camera).
    pub async fn test_camera(&mut self) -> Result<(), VerificationError> {
        let detector = self
            .detector
            .clone()
            .ok_or(VerificationError::ModelNotReady)?;
        if self.media.is_none() {
            return Err(MediaError::HandleReleased.into());
        }

        let token = self.machine.begin_camera_test(Timestamp::now())?;
        let mut cancel_rx = self.cancel.subscribe();
        let mut interval = tokio::time::interval(Duration::from_millis(SCAN_CADENCE_MS));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick resolves immediately; consume it so every sample
        // waits a full cadence.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = wait_cancelled(&mut cancel_rx) => {}
            }

            // Checked before every state mutation.
            if *cancel_rx.borrow() {
                self.machine.cancel_scan();
                self.release_media();
                return Err(VerificationError::Cancelled);
            }

            let detection = match self.media.as_ref() {
                Some(media) => media.current_frame().and_then(|frame| detector.detect(&frame)),
                None => return Err(MediaError::HandleReleased.into()),
            };

            match self.machine.camera_tick(token, detection) {
                Ok(ScanTick::InProgress { percent }) => {
                    let _ = self.progress.send(percent);
                }
                Ok(ScanTick::Verified) => {
                    let _ = self.progress.send(100);
                    return Ok(());
                }
                Ok(ScanTick::Failed) => {
                    let _ = self.progress.send(0);
                    return Err(VerificationError::NoFaceDetected);
                }
                Err(VerificationError::StaleScan) => return Err(VerificationError::Cancelled),
                Err(other) => return Err(other),
            }
        }
    }

    /// Run the microphone test: a 2.5 s window decided by the
    /// instantaneous sample at expiry.
    pub async fn test_microphone(&mut self) -> Result<(), VerificationError> {
        let token = self.machine.begin_mic_test()?;
        let mut cancel_rx = self.cancel.subscribe();

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(MIC_TEST_DURATION_MS)) => {}
            _ = wait_cancelled(&mut cancel_rx) => {}
        }

        if *cancel_rx.borrow() {
            self.machine.cancel_mic_test();
            return Err(VerificationError::Cancelled);
        }

        let level = self.meter.as_ref().and_then(|m| m.level());
        match self.machine.complete_mic_test(token, level)? {
            MicOutcome::Verified => Ok(()),
            MicOutcome::Rejected(MicRejection::InsufficientSignal { level, threshold }) => {
                Err(VerificationError::InsufficientSignal { level, threshold })
            }
            MicOutcome::Rejected(MicRejection::NoSignal) => Err(VerificationError::NoSignal),
        }
    }

    /// Reset a failed camera check for another attempt.
    pub fn retry_camera(&mut self) -> Result<(), VerificationError> {
        self.machine.retry_camera()
    }

    /// Reset a failed microphone check for another attempt.
    pub fn retry_microphone(&mut self) -> Result<(), VerificationError> {
        self.machine.retry_microphone()
    }

    /// Abandon verification: cancel in-flight checks and release the
    /// media handle.
    pub fn abandon(&mut self) {
        let _ = self.cancel.send(true);
        self.machine.cancel_scan();
        self.machine.cancel_mic_test();
        self.release_media();
        tracing::info!("verification abandoned");
    }

    /// Transfer the certified media handle to the live session.
    ///
    /// Fail-closed: permitted only when both lanes are verified. On
    /// success this session no longer holds media; the live session owns
    /// the tracks from here on.
    pub fn take_certified_media(&mut self) -> Result<MediaHandle, VerificationError> {
        if !self.machine.can_start() {
            return Err(VerificationError::NotVerified);
        }
        // The meter's sequence ends with verification; the live session
        // does not restart it.
        self.meter = None;
        self.media
            .take()
            .ok_or_else(|| MediaError::HandleReleased.into())
    }

    fn release_media(&mut self) {
        self.meter = None;
        if let Some(handle) = self.media.take() {
            handle.stop();
        }
    }
}
