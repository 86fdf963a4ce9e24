//! Live-session environment monitoring.
//!
//! Once the session gate permits start, the monitor subscribes to
//! environment signals (visibility, focus, keyboard, fullscreen) and
//! raises violations. Signal wiring is abstracted behind [`SignalSource`]
//! so the monitor runs against synthetic sources in tests; violation
//! detection itself never fails — unavailable sources degrade gracefully
//! rather than blocking session start.

pub mod error;
pub mod fullscreen;
pub mod keys;
pub mod monitor;
pub mod signal;

pub use error::SignalError;
pub use fullscreen::{FullscreenControl, FullscreenLock};
pub use keys::KeyCombo;
pub use monitor::{pump_signals, Disposition, ViolationMonitor};
pub use signal::{EnvironmentSignal, SignalSource, SignalSubscription};
