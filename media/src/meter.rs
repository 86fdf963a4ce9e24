//! Continuous audio level metering.

use crate::error::MediaError;
use crate::handle::MediaHandle;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use vigil_types::{params::DISPLAY_CADENCE_MS, LoudnessSample};

/// Samples the microphone at the display refresh cadence and publishes the
/// most recent level into a last-write-wins channel.
///
/// The published sequence is continuous, infinite and non-restartable: it
/// runs from [`start`](AudioLevelMeter::start) until the media handle is
/// released, and a stopped meter cannot be resumed. Reading never blocks
/// the caller. `None` means "no data" — an unsupported environment or a
/// released track — which callers must treat distinctly from a level below
/// threshold.
pub struct AudioLevelMeter {
    rx: watch::Receiver<Option<LoudnessSample>>,
    task: JoinHandle<()>,
}

impl AudioLevelMeter {
    /// Start sampling the handle's audio track.
    ///
    /// Fails closed: if the handle is released this returns
    /// [`MediaError::HandleReleased`], and if no analysable audio track is
    /// present, [`MediaError::MeterUnsupported`]. Must be called within a
    /// tokio runtime.
    pub fn start(handle: &MediaHandle) -> Result<Self, MediaError> {
        if handle.is_stopped() {
            return Err(MediaError::HandleReleased);
        }
        if !handle.has_audio() || !handle.supports_audio_analysis() {
            return Err(MediaError::MeterUnsupported);
        }

        let tap = handle.audio_tap();
        let (tx, rx) = watch::channel(None);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(DISPLAY_CADENCE_MS));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match tap.sample_level() {
                    Some(level) => {
                        if tx.send(Some(level)).is_err() {
                            break;
                        }
                    }
                    None => {
                        // Track released — the sequence ends here.
                        let _ = tx.send(None);
                        break;
                    }
                }
            }
            tracing::debug!("audio level meter stopped");
        });

        Ok(Self { rx, task })
    }

    /// The most recent sample, or `None` if no data has been produced yet
    /// (or the track has been released).
    pub fn level(&self) -> Option<LoudnessSample> {
        *self.rx.borrow()
    }

    /// A receiver over the published samples, for live level displays.
    pub fn subscribe(&self) -> watch::Receiver<Option<LoudnessSample>> {
        self.rx.clone()
    }

    /// Wait for the next published value. Returns `None` once the sequence
    /// has ended.
    pub async fn next_level(&mut self) -> Option<LoudnessSample> {
        if self.rx.changed().await.is_err() {
            return None;
        }
        *self.rx.borrow()
    }
}

impl Drop for AudioLevelMeter {
    fn drop(&mut self) {
        self.task.abort();
    }
}
