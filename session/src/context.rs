//! The live exam session — a session-scoped context object.
//!
//! Constructing an [`ExamSession`] *is* the session start signal: it fails
//! closed unless the gate permits, so downstream consumers (the exam form)
//! are unreachable without certified hardware. The context owns the media
//! handle, the violation monitor, the signal registration and the
//! fullscreen lock, and tears all of them down on every exit path.

use crate::error::SessionError;
use crate::gate::{self, EscalationPolicy};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use vigil_media::MediaHandle;
use vigil_monitor::{
    pump_signals, Disposition, EnvironmentSignal, FullscreenControl, FullscreenLock, SignalSource,
    ViolationMonitor,
};
use vigil_types::{ProctorParams, Timestamp, ViolationEvent};

/// Post-session integrity report: the ordered violation sequence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionReport {
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub tally: u32,
    pub violations: Vec<ViolationEvent>,
}

/// An active, monitored exam session.
pub struct ExamSession {
    media: Option<MediaHandle>,
    monitor: Arc<Mutex<ViolationMonitor>>,
    policy: EscalationPolicy,
    stop: watch::Sender<bool>,
    pump: Option<JoinHandle<()>>,
    fullscreen: Option<FullscreenLock>,
    started_at: Timestamp,
}

impl ExamSession {
    /// Start the session.
    ///
    /// Fail-closed: returns `NotVerified` unless both lanes passed
    /// certification, and only then takes ownership of the media handle
    /// from the verification flow. Environment wiring degrades gracefully:
    /// an unavailable signal source or fullscreen capability is logged and
    /// the session proceeds. Must be called within a tokio runtime.
    pub fn start(
        verification: &mut vigil_verification::VerificationSession,
        signals: &dyn SignalSource,
        fullscreen: Box<dyn FullscreenControl>,
        params: &ProctorParams,
    ) -> Result<Self, SessionError> {
        if !gate::can_start(&verification.snapshot()) {
            return Err(SessionError::NotVerified);
        }
        let media = verification.take_certified_media()?;

        let monitor = Arc::new(Mutex::new(ViolationMonitor::new(params.flag_fullscreen_exit)));
        let (stop, stop_rx) = watch::channel(false);

        let pump = match signals.register() {
            Ok(subscription) => Some(tokio::spawn(pump_signals(
                Arc::clone(&monitor),
                subscription,
                stop_rx,
            ))),
            Err(err) => {
                tracing::warn!(%err, "environment signals unavailable, continuing degraded");
                None
            }
        };

        let fullscreen = if params.require_fullscreen {
            FullscreenLock::engage(fullscreen)
        } else {
            None
        };

        tracing::info!("exam session started");
        Ok(Self {
            media: Some(media),
            monitor,
            policy: EscalationPolicy {
                max_violations: params.max_violations,
            },
            stop,
            pump,
            fullscreen,
            started_at: Timestamp::now(),
        })
    }

    /// Synchronous signal hook for hosts that must suppress default
    /// actions (restricted keys, context menu) in their event handler.
    pub fn observe(&self, signal: EnvironmentSignal) -> Disposition {
        self.lock_monitor().observe(signal, Timestamp::now())
    }

    /// Current violation count.
    pub fn tally(&self) -> u32 {
        self.lock_monitor().tally()
    }

    /// The most recent violation's message, for the transient warning
    /// banner.
    pub fn last_warning(&self) -> Option<String> {
        self.lock_monitor().last_message().map(str::to_owned)
    }

    /// Snapshot of all violations so far, in order.
    pub fn violations(&self) -> Vec<ViolationEvent> {
        self.lock_monitor().events().to_vec()
    }

    /// Whether the tally has crossed the configured escalation threshold.
    pub fn should_auto_escalate(&self) -> bool {
        gate::should_auto_escalate(self.tally(), &self.policy)
    }

    /// The live media handle, for the proctoring video overlay.
    pub fn media(&self) -> Option<&MediaHandle> {
        self.media.as_ref()
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// End the session: drain the signal pump, release every resource,
    /// and produce the integrity report.
    pub async fn end(mut self) -> SessionReport {
        let _ = self.stop.send(true);
        if let Some(pump) = self.pump.take() {
            let _ = pump.await;
        }
        let violations = self.lock_monitor().events().to_vec();
        let report = SessionReport {
            started_at: self.started_at,
            ended_at: Timestamp::now(),
            tally: violations.len() as u32,
            violations,
        };
        self.teardown();
        tracing::info!(tally = report.tally, "exam session ended");
        report
    }

    fn lock_monitor(&self) -> std::sync::MutexGuard<'_, ViolationMonitor> {
        self.monitor.lock().expect("violation monitor lock poisoned")
    }

    fn teardown(&mut self) {
        let _ = self.stop.send(true);
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
        if let Some(media) = self.media.take() {
            media.stop();
        }
        // Dropping the lock exits fullscreen.
        self.fullscreen.take();
    }
}

impl Drop for ExamSession {
    fn drop(&mut self) {
        // Abnormal exit still deregisters listeners, stops tracks and
        // releases the fullscreen lock.
        self.teardown();
    }
}
