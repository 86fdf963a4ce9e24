//! Violation detection over environment signals.

use crate::signal::{EnvironmentSignal, SignalSubscription};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use vigil_types::{Timestamp, ViolationEvent, ViolationKind};

/// What the host should do with the signal's default action.
///
/// Suppression of restricted keys is a security control, not cosmetic —
/// the host must prevent the default action in addition to the recorded
/// violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Let the default action proceed.
    Observe,
    /// Prevent the default action.
    Suppress,
}

/// Owns the violation sequence for the lifetime of one exam session.
///
/// Events are append-only and the tally is monotonically non-decreasing.
/// The most recent violation's message is surfaced for transient display
/// (last-write-wins, not a queue). Single-writer: all mutations go through
/// [`observe`](ViolationMonitor::observe).
pub struct ViolationMonitor {
    events: Vec<ViolationEvent>,
    last_message: Option<String>,
    flag_fullscreen_exit: bool,
}

impl ViolationMonitor {
    pub fn new(flag_fullscreen_exit: bool) -> Self {
        Self {
            events: Vec::new(),
            last_message: None,
            flag_fullscreen_exit,
        }
    }

    /// Process one environment signal: record a violation where the
    /// trigger table says so, and tell the host whether to suppress the
    /// default action.
    pub fn observe(&mut self, signal: EnvironmentSignal, now: Timestamp) -> Disposition {
        match signal {
            EnvironmentSignal::VisibilityHidden => {
                self.flag(ViolationKind::TabSwitch, now);
                Disposition::Observe
            }
            EnvironmentSignal::FocusLost => {
                self.flag(ViolationKind::FocusLost, now);
                Disposition::Observe
            }
            EnvironmentSignal::KeyPress(combo) => {
                if combo.is_restricted() {
                    self.flag(ViolationKind::RestrictedKey, now);
                    Disposition::Suppress
                } else {
                    Disposition::Observe
                }
            }
            EnvironmentSignal::FullscreenExited => {
                if self.flag_fullscreen_exit {
                    self.flag(ViolationKind::FullscreenExit, now);
                } else {
                    tracing::debug!("fullscreen exited (not flagged under minimal policy)");
                }
                Disposition::Observe
            }
            // Right click is suppressed without raising a violation.
            EnvironmentSignal::ContextMenu => Disposition::Suppress,
        }
    }

    fn flag(&mut self, kind: ViolationKind, now: Timestamp) {
        let event = ViolationEvent::new(kind, now);
        tracing::warn!(%kind, tally = self.events.len() + 1, "violation recorded");
        self.last_message = Some(event.message.clone());
        self.events.push(event);
    }

    /// Number of violations so far.
    pub fn tally(&self) -> u32 {
        self.events.len() as u32
    }

    /// All recorded events, in order.
    pub fn events(&self) -> &[ViolationEvent] {
        &self.events
    }

    /// The most recent violation's message, for transient display.
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Consume the monitor, yielding the full event sequence.
    pub fn into_events(self) -> Vec<ViolationEvent> {
        self.events
    }
}

/// Drive a monitor from a signal subscription until the source ends or
/// `stop` flips.
///
/// Dispositions cannot flow back through the async pump; hosts that need
/// synchronous default-action suppression call
/// [`ViolationMonitor::observe`] directly from their event handlers and
/// use the pump only for observational signals.
pub async fn pump_signals(
    monitor: Arc<Mutex<ViolationMonitor>>,
    mut subscription: SignalSubscription,
    mut stop: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            signal = subscription.recv() => match signal {
                Some(signal) => {
                    let mut monitor = monitor.lock().expect("violation monitor lock poisoned");
                    monitor.observe(signal, Timestamp::now());
                }
                None => break,
            },
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
        }
    }
    tracing::debug!("signal pump stopped");
    // Subscription drops here — listeners deregister.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyCombo;

    fn at(ms: u64) -> Timestamp {
        Timestamp::new(ms)
    }

    #[test]
    fn tab_switch_records_one_violation() {
        let mut monitor = ViolationMonitor::new(false);
        monitor.observe(EnvironmentSignal::VisibilityHidden, at(10));

        assert_eq!(monitor.tally(), 1);
        assert_eq!(monitor.events()[0].kind, ViolationKind::TabSwitch);
        assert_eq!(monitor.last_message(), Some("Tab switching detected!"));
    }

    #[test]
    fn restricted_key_is_recorded_and_suppressed() {
        let mut monitor = ViolationMonitor::new(false);
        let disposition = monitor.observe(
            EnvironmentSignal::KeyPress(KeyCombo::ctrl("c")),
            at(10),
        );

        assert_eq!(disposition, Disposition::Suppress);
        assert_eq!(monitor.tally(), 1);
        assert_eq!(monitor.events()[0].kind, ViolationKind::RestrictedKey);
    }

    #[test]
    fn allowed_key_is_neither_recorded_nor_suppressed() {
        let mut monitor = ViolationMonitor::new(false);
        let disposition =
            monitor.observe(EnvironmentSignal::KeyPress(KeyCombo::plain("a")), at(10));

        assert_eq!(disposition, Disposition::Observe);
        assert_eq!(monitor.tally(), 0);
    }

    #[test]
    fn context_menu_is_suppressed_without_violation() {
        let mut monitor = ViolationMonitor::new(false);
        let disposition = monitor.observe(EnvironmentSignal::ContextMenu, at(10));

        assert_eq!(disposition, Disposition::Suppress);
        assert_eq!(monitor.tally(), 0);
    }

    #[test]
    fn fullscreen_exit_not_flagged_under_minimal_policy() {
        let mut monitor = ViolationMonitor::new(false);
        monitor.observe(EnvironmentSignal::FullscreenExited, at(10));
        assert_eq!(monitor.tally(), 0);
    }

    #[test]
    fn fullscreen_exit_flagged_when_policy_enables_it() {
        let mut monitor = ViolationMonitor::new(true);
        monitor.observe(EnvironmentSignal::FullscreenExited, at(10));
        assert_eq!(monitor.tally(), 1);
        assert_eq!(monitor.events()[0].kind, ViolationKind::FullscreenExit);
    }

    #[test]
    fn last_message_wins() {
        let mut monitor = ViolationMonitor::new(false);
        monitor.observe(EnvironmentSignal::VisibilityHidden, at(10));
        monitor.observe(EnvironmentSignal::FocusLost, at(20));

        assert_eq!(monitor.tally(), 2);
        assert_eq!(monitor.last_message(), Some("Window focus lost!"));
    }

    #[test]
    fn events_are_append_only_and_ordered() {
        let mut monitor = ViolationMonitor::new(false);
        monitor.observe(EnvironmentSignal::VisibilityHidden, at(1));
        monitor.observe(EnvironmentSignal::KeyPress(KeyCombo::plain("PrintScreen")), at(2));
        monitor.observe(EnvironmentSignal::FocusLost, at(3));

        let events = monitor.into_events();
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::TabSwitch,
                ViolationKind::RestrictedKey,
                ViolationKind::FocusLost
            ]
        );
        assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test(start_paused = true)]
    async fn pump_records_signals_and_stops() {
        use tokio::sync::{mpsc, watch};

        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = SignalSubscription::new(rx, None);
        let monitor = Arc::new(Mutex::new(ViolationMonitor::new(false)));
        let (stop_tx, stop_rx) = watch::channel(false);

        let pump = tokio::spawn(pump_signals(Arc::clone(&monitor), subscription, stop_rx));

        tx.send(EnvironmentSignal::VisibilityHidden).expect("send");
        tx.send(EnvironmentSignal::FocusLost).expect("send");
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        stop_tx.send(true).expect("stop");
        pump.await.expect("pump");

        let monitor = monitor.lock().expect("lock");
        assert_eq!(monitor.tally(), 2);
    }
}
