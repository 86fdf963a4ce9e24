//! Certification state machine — connects device acquisition, liveness
//! detection, and loudness sampling into the camera/microphone check
//! workflow.
//!
//! The machine is pure and synchronous: drivers feed it detector results
//! and timer expiries, and it emits [`VerificationEvent`]s for the
//! embedding application to drain. All scan state (progress, the sticky
//! seen-flag) lives here, not in the detector.

use crate::error::VerificationError;
use crate::state::{ScanSession, VerificationState};
use vigil_media::FaceDetection;
use vigil_types::{
    params::SCAN_PROGRESS_INCREMENT, CheckState, Faculty, FailureLanePolicy, LoudnessSample,
    ProctorParams, Timestamp,
};

/// Events emitted by the state machine for the embedding application.
#[derive(Clone, Debug, PartialEq)]
pub enum VerificationEvent {
    /// The liveness model finished loading; camera checks are unblocked.
    ModelReady,
    /// Device acquisition failed; the camera lane is `Failed` with a retry
    /// affordance.
    AcquisitionFailed,
    /// A camera scan has begun.
    CameraTestStarted,
    /// Scan progress advanced to the given percentage.
    ScanProgress { percent: u8 },
    /// The camera lane passed certification.
    CameraVerified,
    /// The scan completed without satisfying the liveness policy.
    CameraFailed,
    /// An in-flight scan was cancelled; no completion event will follow.
    ScanCancelled,
    /// A failed camera check was reset for another attempt.
    CameraRetry,
    /// A microphone test window has opened.
    MicTestStarted,
    /// The microphone lane passed certification.
    MicVerified,
    /// The microphone test was rejected and the lane reset.
    MicRejected { rejection: MicRejection },
    /// An in-flight microphone test was cancelled.
    MicTestCancelled,
}

/// Why a microphone test was rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MicRejection {
    /// The sampled level did not exceed the threshold.
    InsufficientSignal { level: f32, threshold: f32 },
    /// The level meter produced no data — distinct from a low level.
    NoSignal,
}

/// Outcome of a single camera scan tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanTick {
    InProgress { percent: u8 },
    Verified,
    Failed,
}

/// Outcome of a completed microphone test window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MicOutcome {
    Verified,
    Rejected(MicRejection),
}

/// Opaque token identifying one test attempt.
///
/// Issued when a test begins; callbacks carrying a token from a cancelled
/// or superseded attempt are rejected with `StaleScan` before any state
/// mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TestToken {
    epoch: u64,
}

/// The certification state machine.
///
/// One lane per faculty, independent, composed with AND semantics by the
/// session gate. Only this machine mutates [`CheckState`].
pub struct VerificationStateMachine {
    params: ProctorParams,
    camera: CheckState,
    microphone: CheckState,
    scan: Option<ScanSession>,
    mic_epoch: Option<u64>,
    model_ready: bool,
    epoch: u64,
    pending_events: Vec<VerificationEvent>,
}

impl VerificationStateMachine {
    pub fn new(params: ProctorParams) -> Self {
        Self {
            params,
            camera: CheckState::Pending,
            microphone: CheckState::Pending,
            scan: None,
            mic_epoch: None,
            model_ready: false,
            epoch: 0,
            pending_events: Vec::new(),
        }
    }

    pub fn params(&self) -> &ProctorParams {
        &self.params
    }

    pub fn camera(&self) -> CheckState {
        self.camera
    }

    pub fn microphone(&self) -> CheckState {
        self.microphone
    }

    /// Snapshot of both lanes for the session gate.
    pub fn snapshot(&self) -> VerificationState {
        VerificationState {
            camera: self.camera,
            microphone: self.microphone,
        }
    }

    /// The in-progress scan, if the camera lane is testing.
    pub fn scan(&self) -> Option<&ScanSession> {
        self.scan.as_ref()
    }

    /// Current scan progress; 0 outside of a scan (including after a
    /// failed scan, which resets progress).
    pub fn progress_percent(&self) -> u8 {
        self.scan.as_ref().map_or(0, |s| s.progress_percent())
    }

    pub fn model_ready(&self) -> bool {
        self.model_ready
    }

    /// Mark the liveness model loaded, unblocking camera checks.
    pub fn set_model_ready(&mut self) {
        if !self.model_ready {
            self.model_ready = true;
            self.pending_events.push(VerificationEvent::ModelReady);
        }
    }

    /// Record a device acquisition failure: the camera lane fails
    /// immediately with a retry affordance.
    pub fn record_acquisition_failure(&mut self) {
        if self.camera.is_verified() {
            return;
        }
        self.scan = None;
        self.camera = CheckState::Failed;
        self.pending_events
            .push(VerificationEvent::AcquisitionFailed);
    }

    /// Drain all pending events for the embedding application.
    pub fn drain_events(&mut self) -> Vec<VerificationEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── Camera lane ─────────────────────────────────────────────────────

    /// Begin a camera scan.
    ///
    /// Precondition: the liveness model is loaded; otherwise this fails
    /// with `ModelNotReady` and the lane stays `Pending`.
    pub fn begin_camera_test(&mut self, now: Timestamp) -> Result<TestToken, VerificationError> {
        if !self.model_ready {
            return Err(VerificationError::ModelNotReady);
        }
        if !self.camera.can_begin_test() {
            return Err(VerificationError::InvalidTransition {
                faculty: Faculty::Camera,
                from: self.camera,
            });
        }

        self.epoch += 1;
        self.camera = CheckState::Testing;
        self.scan = Some(ScanSession::new(now, self.epoch));
        self.pending_events
            .push(VerificationEvent::CameraTestStarted);
        tracing::debug!(epoch = self.epoch, "camera scan started");
        Ok(TestToken { epoch: self.epoch })
    }

    /// Apply one sampling tick to the in-flight scan.
    ///
    /// A tick carrying a stale token — the scan was cancelled or superseded
    /// — is rejected before any state mutation.
    pub fn camera_tick(
        &mut self,
        token: TestToken,
        detection: Option<FaceDetection>,
    ) -> Result<ScanTick, VerificationError> {
        let scan = match self.scan.as_mut() {
            Some(scan) if scan.epoch() == token.epoch => scan,
            _ => return Err(VerificationError::StaleScan),
        };

        scan.advance(SCAN_PROGRESS_INCREMENT, detection.is_some());

        if !scan.complete() {
            let percent = scan.progress_percent();
            self.pending_events
                .push(VerificationEvent::ScanProgress { percent });
            return Ok(ScanTick::InProgress { percent });
        }

        // Scan window finished — the ScanSession is destroyed either way.
        let positives = scan.positive_ticks();
        self.scan = None;

        if self.params.liveness.satisfied_by(positives) {
            self.camera = CheckState::Verified;
            self.pending_events.push(VerificationEvent::CameraVerified);
            tracing::info!(positives, "camera lane verified");
            Ok(ScanTick::Verified)
        } else {
            self.camera = CheckState::Failed;
            self.pending_events.push(VerificationEvent::CameraFailed);
            tracing::info!(positives, "camera lane failed — no face detected");
            Ok(ScanTick::Failed)
        }
    }

    /// Cancel an in-flight scan. The lane returns to `Pending` and any
    /// outstanding tick callbacks become stale.
    pub fn cancel_scan(&mut self) {
        if self.scan.take().is_some() {
            self.epoch += 1;
            self.camera = CheckState::Pending;
            self.pending_events.push(VerificationEvent::ScanCancelled);
            tracing::debug!("camera scan cancelled");
        }
    }

    /// Reset a failed camera check for another attempt.
    pub fn retry_camera(&mut self) -> Result<(), VerificationError> {
        if self.camera != CheckState::Failed {
            return Err(VerificationError::InvalidTransition {
                faculty: Faculty::Camera,
                from: self.camera,
            });
        }
        self.camera = CheckState::Pending;
        self.pending_events.push(VerificationEvent::CameraRetry);
        Ok(())
    }

    // ── Microphone lane ─────────────────────────────────────────────────

    /// Open a microphone test window.
    pub fn begin_mic_test(&mut self) -> Result<TestToken, VerificationError> {
        if !self.microphone.can_begin_test() {
            return Err(VerificationError::InvalidTransition {
                faculty: Faculty::Microphone,
                from: self.microphone,
            });
        }

        self.epoch += 1;
        self.microphone = CheckState::Testing;
        self.mic_epoch = Some(self.epoch);
        self.pending_events.push(VerificationEvent::MicTestStarted);
        tracing::debug!(epoch = self.epoch, "microphone test started");
        Ok(TestToken { epoch: self.epoch })
    }

    /// Complete a microphone test with the instantaneous sample taken at
    /// timer expiry.
    ///
    /// The decision uses that single sample, not an aggregate over the
    /// window. `None` means the meter produced no data, which is rejected
    /// as `NoSignal` — fail closed, distinct from a low level.
    pub fn complete_mic_test(
        &mut self,
        token: TestToken,
        level: Option<LoudnessSample>,
    ) -> Result<MicOutcome, VerificationError> {
        match self.mic_epoch {
            Some(epoch) if epoch == token.epoch => {}
            _ => return Err(VerificationError::StaleScan),
        }
        self.mic_epoch = None;

        let threshold = self.params.mic_threshold;
        match level {
            Some(sample) if sample.exceeds(threshold) => {
                self.microphone = CheckState::Verified;
                self.pending_events.push(VerificationEvent::MicVerified);
                tracing::info!(level = sample.value(), "microphone lane verified");
                Ok(MicOutcome::Verified)
            }
            Some(sample) => {
                let rejection = MicRejection::InsufficientSignal {
                    level: sample.value(),
                    threshold,
                };
                self.reject_mic(rejection);
                Ok(MicOutcome::Rejected(rejection))
            }
            None => {
                let rejection = MicRejection::NoSignal;
                self.reject_mic(rejection);
                Ok(MicOutcome::Rejected(rejection))
            }
        }
    }

    fn reject_mic(&mut self, rejection: MicRejection) {
        self.microphone = match self.params.mic_failure_lane {
            FailureLanePolicy::ResetToPending => CheckState::Pending,
            FailureLanePolicy::TerminalFailed => CheckState::Failed,
        };
        self.pending_events
            .push(VerificationEvent::MicRejected { rejection });
        tracing::info!(?rejection, "microphone lane rejected");
    }

    /// Cancel an in-flight microphone test. The lane returns to `Pending`.
    pub fn cancel_mic_test(&mut self) {
        if self.mic_epoch.take().is_some() {
            self.epoch += 1;
            self.microphone = CheckState::Pending;
            self.pending_events
                .push(VerificationEvent::MicTestCancelled);
            tracing::debug!("microphone test cancelled");
        }
    }

    /// Reset a failed microphone check for another attempt. Only reachable
    /// under the `TerminalFailed` failure-lane policy.
    pub fn retry_microphone(&mut self) -> Result<(), VerificationError> {
        if self.microphone != CheckState::Failed {
            return Err(VerificationError::InvalidTransition {
                faculty: Faculty::Microphone,
                from: self.microphone,
            });
        }
        self.microphone = CheckState::Pending;
        Ok(())
    }

    // ── Gate ────────────────────────────────────────────────────────────

    /// Whether both lanes are verified. No partial start is permitted.
    pub fn can_start(&self) -> bool {
        self.snapshot().all_verified()
    }
}
