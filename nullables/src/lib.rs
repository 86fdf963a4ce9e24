//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the engine (clock, capture devices, the
//! liveness detector, environment signals, fullscreen) are abstracted
//! behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch real hardware or a real UI runtime
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod detector;
pub mod device;
pub mod signals;

pub use clock::NullClock;
pub use detector::{NullDetector, NullModelLoader};
pub use device::{AudioLevelControl, NullMediaDevice};
pub use signals::{NullFullscreen, NullSignals};
