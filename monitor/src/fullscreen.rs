//! Fullscreen lockdown for the live session.

use crate::error::SignalError;

/// Host-environment fullscreen capability.
pub trait FullscreenControl: Send {
    fn enter(&mut self) -> Result<(), SignalError>;
    fn exit(&mut self);
}

/// An engaged fullscreen lock, released on drop.
///
/// Setup and teardown are symmetric: a lock taken on session entry is
/// always released on session exit, including abnormal exit.
pub struct FullscreenLock {
    control: Box<dyn FullscreenControl>,
}

impl FullscreenLock {
    /// Enter fullscreen. Unsupported environments degrade gracefully —
    /// the session proceeds without a lock rather than being blocked.
    pub fn engage(mut control: Box<dyn FullscreenControl>) -> Option<Self> {
        match control.enter() {
            Ok(()) => Some(Self { control }),
            Err(err) => {
                tracing::warn!(%err, "continuing without fullscreen lock");
                None
            }
        }
    }
}

impl Drop for FullscreenLock {
    fn drop(&mut self) {
        self.control.exit();
    }
}
