//! Environment signal abstraction.
//!
//! The monitor never talks to a real document/window; host runtimes
//! implement [`SignalSource`] and forward browser-level events. Tests
//! inject synthetic sources.

use crate::error::SignalError;
use crate::keys::KeyCombo;
use tokio::sync::mpsc;

/// An environment event observed by the host runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnvironmentSignal {
    /// The document became hidden (tab switch / minimize).
    VisibilityHidden,
    /// The window lost input focus.
    FocusLost,
    /// A key press, with modifier state.
    KeyPress(KeyCombo),
    /// The session left fullscreen.
    FullscreenExited,
    /// A context-menu request (right click).
    ContextMenu,
}

/// A live registration on a signal source.
///
/// Receives signals until dropped; dropping deregisters the underlying
/// listeners. Registration and deregistration are symmetric on every exit
/// path.
pub struct SignalSubscription {
    rx: mpsc::UnboundedReceiver<EnvironmentSignal>,
    unregister: Option<Box<dyn FnOnce() + Send>>,
}

impl SignalSubscription {
    pub fn new(
        rx: mpsc::UnboundedReceiver<EnvironmentSignal>,
        unregister: Option<Box<dyn FnOnce() + Send>>,
    ) -> Self {
        Self { rx, unregister }
    }

    /// Receive the next signal; `None` once the source is gone.
    pub async fn recv(&mut self) -> Option<EnvironmentSignal> {
        self.rx.recv().await
    }
}

impl Drop for SignalSubscription {
    fn drop(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

/// Registers listeners on the host environment.
pub trait SignalSource: Send + Sync {
    /// Register listeners and return the subscription. Fails if the
    /// environment cannot deliver signals — callers degrade gracefully
    /// rather than blocking session start.
    fn register(&self) -> Result<SignalSubscription, SignalError>;
}
