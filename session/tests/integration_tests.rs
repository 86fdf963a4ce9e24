//! Integration tests exercising the full proctoring pipeline:
//! device acquisition → hardware certification → session gate → live
//! monitored session → integrity report.
//!
//! These tests wire together components that are normally only connected
//! inside an embedding application, verifying the engine works end-to-end
//! — not just in isolation.

use std::time::Duration;
use vigil_media::ModelManifest;
use vigil_monitor::{Disposition, EnvironmentSignal, KeyCombo};
use vigil_nullables::{NullDetector, NullFullscreen, NullMediaDevice, NullModelLoader, NullSignals};
use vigil_session::{ExamSession, ProctorConfig, SessionError};
use vigil_types::{CheckState, ProctorParams, ViolationKind};
use vigil_verification::{VerificationError, VerificationSession};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn manifest() -> ModelManifest {
    ProctorConfig::default().model_manifest()
}

/// Run the full certification flow to a both-lanes-verified session.
async fn certified_session(
    device: &NullMediaDevice,
    detector: NullDetector,
    params: ProctorParams,
) -> VerificationSession {
    let control = device.audio_level_control();
    let mut session = VerificationSession::new(params);
    session.acquire_media(device).await.expect("acquire");
    session
        .load_model(&NullModelLoader::ready(detector), &manifest())
        .await
        .expect("model");
    session.test_camera().await.expect("camera");
    control.set(80.0);
    session.test_microphone().await.expect("microphone");
    session
}

/// Give the spawned signal pump a chance to drain.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

// ---------------------------------------------------------------------------
// 1. Certification end-to-end (scan and microphone windows)
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn camera_scan_verifies_with_single_positive_at_tick_seven() {
    let device = NullMediaDevice::granting();
    let mut session = VerificationSession::new(ProctorParams::default());
    session.acquire_media(&device).await.expect("acquire");
    session
        .load_model(
            &NullModelLoader::ready(NullDetector::positive_at(&[7])),
            &manifest(),
        )
        .await
        .expect("model");

    session.test_camera().await.expect("verified at tick 20");
    assert_eq!(session.snapshot().camera, CheckState::Verified);
}

#[tokio::test(start_paused = true)]
async fn camera_scan_fails_with_zero_positives_and_resets_progress() {
    let device = NullMediaDevice::granting();
    let mut session = VerificationSession::new(ProctorParams::default());
    session.acquire_media(&device).await.expect("acquire");
    session
        .load_model(&NullModelLoader::ready(NullDetector::never()), &manifest())
        .await
        .expect("model");

    let result = session.test_camera().await;
    assert!(matches!(result, Err(VerificationError::NoFaceDetected)));
    assert_eq!(session.snapshot().camera, CheckState::Failed);
    assert_eq!(session.machine().progress_percent(), 0);
}

#[tokio::test(start_paused = true)]
async fn microphone_silent_window_returns_to_pending() {
    let device = NullMediaDevice::granting();
    let mut session = VerificationSession::new(ProctorParams::default());
    session.acquire_media(&device).await.expect("acquire");

    let result = session.test_microphone().await;
    assert!(matches!(
        result,
        Err(VerificationError::InsufficientSignal { .. })
    ));
    assert_eq!(session.snapshot().microphone, CheckState::Pending);
}

#[tokio::test(start_paused = true)]
async fn microphone_spike_exactly_at_expiry_verifies() {
    let device = NullMediaDevice::granting();
    let control = device.audio_level_control();
    let mut session = VerificationSession::new(ProctorParams::default());
    session.acquire_media(&device).await.expect("acquire");

    let test = session.test_microphone();
    let spike = async {
        // Silent for nearly the whole window; a spike right before expiry
        // is what the instantaneous decision sees.
        tokio::time::sleep(Duration::from_millis(2450)).await;
        control.set(80.0);
    };
    let (result, ()) = tokio::join!(test, spike);

    result.expect("verified");
    assert_eq!(session.snapshot().microphone, CheckState::Verified);
}

// ---------------------------------------------------------------------------
// 2. Session gate
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn gate_blocks_session_start_until_both_lanes_verified() {
    let params = ProctorParams::default();
    let device = NullMediaDevice::granting();
    let signals = NullSignals::new();
    let fullscreen = NullFullscreen::new();

    // Camera verified, microphone still pending.
    let mut session = VerificationSession::new(params.clone());
    session.acquire_media(&device).await.expect("acquire");
    session
        .load_model(&NullModelLoader::ready(NullDetector::always()), &manifest())
        .await
        .expect("model");
    session.test_camera().await.expect("camera");

    let result = ExamSession::start(&mut session, &signals, fullscreen.control(), &params);
    assert!(matches!(result, Err(SessionError::NotVerified)));

    // The failed start must not have grabbed any resources.
    assert_eq!(signals.registrations(), 0);
    assert_eq!(fullscreen.enters(), 0);
    assert_eq!(device.live_handles(), 1); // still owned by verification
}

// ---------------------------------------------------------------------------
// 3. Live monitored session
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn hidden_document_increments_tally_exactly_once() {
    let params = ProctorParams::default();
    let device = NullMediaDevice::granting();
    let signals = NullSignals::new();
    let fullscreen = NullFullscreen::new();

    let mut verification = certified_session(&device, NullDetector::always(), params.clone()).await;
    let exam = ExamSession::start(&mut verification, &signals, fullscreen.control(), &params)
        .expect("start");

    assert!(signals.emit(EnvironmentSignal::VisibilityHidden));
    settle().await;

    assert_eq!(exam.tally(), 1);
    assert_eq!(exam.last_warning().as_deref(), Some("Tab switching detected!"));
    assert_eq!(exam.violations()[0].kind, ViolationKind::TabSwitch);
}

#[tokio::test(start_paused = true)]
async fn restricted_key_is_suppressed_and_counted_through_the_sync_hook() {
    let params = ProctorParams::default();
    let device = NullMediaDevice::granting();
    let signals = NullSignals::new();
    let fullscreen = NullFullscreen::new();

    let mut verification = certified_session(&device, NullDetector::always(), params.clone()).await;
    let exam = ExamSession::start(&mut verification, &signals, fullscreen.control(), &params)
        .expect("start");

    let disposition = exam.observe(EnvironmentSignal::KeyPress(KeyCombo::ctrl("C")));
    assert_eq!(disposition, Disposition::Suppress);
    assert_eq!(exam.tally(), 1);

    // An allowed key neither suppresses nor counts.
    let disposition = exam.observe(EnvironmentSignal::KeyPress(KeyCombo::plain("a")));
    assert_eq!(disposition, Disposition::Observe);
    assert_eq!(exam.tally(), 1);
}

#[tokio::test(start_paused = true)]
async fn session_report_carries_ordered_violations() {
    let params = ProctorParams::default();
    let device = NullMediaDevice::granting();
    let signals = NullSignals::new();
    let fullscreen = NullFullscreen::new();

    let mut verification = certified_session(&device, NullDetector::always(), params.clone()).await;
    let exam = ExamSession::start(&mut verification, &signals, fullscreen.control(), &params)
        .expect("start");

    signals.emit(EnvironmentSignal::VisibilityHidden);
    settle().await;
    signals.emit(EnvironmentSignal::FocusLost);
    settle().await;

    let report = exam.end().await;
    assert_eq!(report.tally, 2);
    let kinds: Vec<_> = report.violations.iter().map(|v| v.kind).collect();
    assert_eq!(kinds, vec![ViolationKind::TabSwitch, ViolationKind::FocusLost]);
}

#[tokio::test(start_paused = true)]
async fn auto_escalation_fires_at_the_configured_threshold() {
    let params = ProctorParams {
        max_violations: Some(2),
        ..ProctorParams::default()
    };
    let device = NullMediaDevice::granting();
    let signals = NullSignals::new();
    let fullscreen = NullFullscreen::new();

    let mut verification = certified_session(&device, NullDetector::always(), params.clone()).await;
    let exam = ExamSession::start(&mut verification, &signals, fullscreen.control(), &params)
        .expect("start");

    signals.emit(EnvironmentSignal::VisibilityHidden);
    settle().await;
    assert!(!exam.should_auto_escalate());

    signals.emit(EnvironmentSignal::FocusLost);
    settle().await;
    assert!(exam.should_auto_escalate());
}

// ---------------------------------------------------------------------------
// 4. Symmetric setup/teardown
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn ending_the_session_releases_every_resource() {
    let params = ProctorParams::default();
    let device = NullMediaDevice::granting();
    let signals = NullSignals::new();
    let fullscreen = NullFullscreen::new();

    let mut verification = certified_session(&device, NullDetector::always(), params.clone()).await;
    let exam = ExamSession::start(&mut verification, &signals, fullscreen.control(), &params)
        .expect("start");

    assert!(signals.is_registered());
    assert!(fullscreen.is_active());
    assert_eq!(device.live_handles(), 1);

    exam.end().await;

    assert!(!signals.is_registered());
    assert!(!fullscreen.is_active());
    assert_eq!(device.live_handles(), 0);
}

#[tokio::test(start_paused = true)]
async fn abnormal_exit_still_tears_down() {
    let params = ProctorParams::default();
    let device = NullMediaDevice::granting();
    let signals = NullSignals::new();
    let fullscreen = NullFullscreen::new();

    let mut verification = certified_session(&device, NullDetector::always(), params.clone()).await;
    let exam = ExamSession::start(&mut verification, &signals, fullscreen.control(), &params)
        .expect("start");

    drop(exam);
    settle().await;

    assert!(!signals.is_registered());
    assert!(!fullscreen.is_active());
    assert_eq!(device.live_handles(), 0);
}

#[test]
fn violation_timestamps_follow_the_clock() {
    use vigil_monitor::ViolationMonitor;
    use vigil_nullables::NullClock;

    let clock = NullClock::new(1_000);
    let mut monitor = ViolationMonitor::new(false);

    monitor.observe(EnvironmentSignal::VisibilityHidden, clock.now());
    clock.advance(350);
    monitor.observe(EnvironmentSignal::FocusLost, clock.now());

    let events = monitor.into_events();
    assert_eq!(events[0].timestamp.as_millis(), 1_000);
    assert_eq!(events[1].timestamp.as_millis(), 1_350);
}

#[tokio::test(start_paused = true)]
async fn degraded_environments_do_not_block_session_start() {
    let params = ProctorParams::default();
    let device = NullMediaDevice::granting();
    let signals = NullSignals::unavailable();
    let fullscreen = NullFullscreen::unsupported();

    let mut verification = certified_session(&device, NullDetector::always(), params.clone()).await;
    let exam = ExamSession::start(&mut verification, &signals, fullscreen.control(), &params)
        .expect("degraded start");

    // Violation detection never fails: the session runs, just unwired.
    assert_eq!(exam.tally(), 0);
    assert!(!fullscreen.is_active());
    exam.end().await;
}
