//! Nullable environment signals — synthetic browser events.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use vigil_monitor::{
    EnvironmentSignal, FullscreenControl, SignalError, SignalSource, SignalSubscription,
};

struct SignalsInner {
    sender: Mutex<Option<mpsc::UnboundedSender<EnvironmentSignal>>>,
    registrations: AtomicUsize,
    deregistrations: AtomicUsize,
    available: bool,
}

/// A signal source driven programmatically from tests.
///
/// Counts registrations and deregistrations so tests can assert symmetric
/// setup/teardown.
pub struct NullSignals {
    inner: Arc<SignalsInner>,
}

impl NullSignals {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalsInner {
                sender: Mutex::new(None),
                registrations: AtomicUsize::new(0),
                deregistrations: AtomicUsize::new(0),
                available: true,
            }),
        }
    }

    /// A source whose registration always fails.
    pub fn unavailable() -> Self {
        Self {
            inner: Arc::new(SignalsInner {
                sender: Mutex::new(None),
                registrations: AtomicUsize::new(0),
                deregistrations: AtomicUsize::new(0),
                available: false,
            }),
        }
    }

    /// Deliver a signal to the current subscriber. Returns whether a
    /// subscriber was registered to receive it.
    pub fn emit(&self, signal: EnvironmentSignal) -> bool {
        let sender = self.inner.sender.lock().expect("signal sender lock poisoned");
        match sender.as_ref() {
            Some(tx) => tx.send(signal).is_ok(),
            None => false,
        }
    }

    pub fn registrations(&self) -> usize {
        self.inner.registrations.load(Ordering::SeqCst)
    }

    pub fn deregistrations(&self) -> usize {
        self.inner.deregistrations.load(Ordering::SeqCst)
    }

    /// Whether a subscription is currently registered.
    pub fn is_registered(&self) -> bool {
        self.registrations() > self.deregistrations()
    }
}

impl Default for NullSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for NullSignals {
    fn register(&self) -> Result<SignalSubscription, SignalError> {
        if !self.inner.available {
            return Err(SignalError::Unavailable("null signals disabled".into()));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *self.inner.sender.lock().expect("signal sender lock poisoned") = Some(tx);
        self.inner.registrations.fetch_add(1, Ordering::SeqCst);

        let inner = Arc::clone(&self.inner);
        Ok(SignalSubscription::new(
            rx,
            Some(Box::new(move || {
                inner.deregistrations.fetch_add(1, Ordering::SeqCst);
                *inner.sender.lock().expect("signal sender lock poisoned") = None;
            })),
        ))
    }
}

struct FullscreenInner {
    enters: AtomicUsize,
    exits: AtomicUsize,
    supported: bool,
}

/// A fullscreen capability that records enter/exit calls.
pub struct NullFullscreen {
    inner: Arc<FullscreenInner>,
}

impl NullFullscreen {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(FullscreenInner {
                enters: AtomicUsize::new(0),
                exits: AtomicUsize::new(0),
                supported: true,
            }),
        }
    }

    /// An environment where entering fullscreen always fails.
    pub fn unsupported() -> Self {
        Self {
            inner: Arc::new(FullscreenInner {
                enters: AtomicUsize::new(0),
                exits: AtomicUsize::new(0),
                supported: false,
            }),
        }
    }

    /// A control handle to hand to the session.
    pub fn control(&self) -> Box<dyn FullscreenControl> {
        Box::new(NullFullscreenControl {
            inner: Arc::clone(&self.inner),
        })
    }

    pub fn enters(&self) -> usize {
        self.inner.enters.load(Ordering::SeqCst)
    }

    pub fn exits(&self) -> usize {
        self.inner.exits.load(Ordering::SeqCst)
    }

    /// Whether fullscreen is currently held.
    pub fn is_active(&self) -> bool {
        self.enters() > self.exits()
    }
}

impl Default for NullFullscreen {
    fn default() -> Self {
        Self::new()
    }
}

struct NullFullscreenControl {
    inner: Arc<FullscreenInner>,
}

impl FullscreenControl for NullFullscreenControl {
    fn enter(&mut self) -> Result<(), SignalError> {
        if !self.inner.supported {
            return Err(SignalError::FullscreenUnsupported);
        }
        self.inner.enters.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exit(&mut self) {
        self.inner.exits.fetch_add(1, Ordering::SeqCst);
    }
}
