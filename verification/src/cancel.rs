//! Cancellation of in-flight checks.
//!
//! Abandoning verification (navigating back) must cancel the sampling loop
//! and the microphone timer without letting either emit a late state
//! transition. Drivers subscribe to a watch channel and check the flag
//! before every state mutation.

use std::sync::Arc;
use tokio::sync::watch;

/// A cloneable handle that cancels the verification flow it was taken from.
///
/// Cancellation is one-way: once triggered, every in-flight and future
/// check in that flow fails with `Cancelled`.
#[derive(Clone)]
pub struct Canceller {
    tx: Arc<watch::Sender<bool>>,
}

impl Canceller {
    pub(crate) fn new(tx: Arc<watch::Sender<bool>>) -> Self {
        Self { tx }
    }

    /// Cancel the verification flow.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Resolve once the flag flips to cancelled; otherwise never.
pub(crate) async fn wait_cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            // Sender gone without cancelling — park forever; the other
            // select arm decides.
            std::future::pending::<()>().await;
        }
    }
}
