//! Fundamental types for the Vigil exam-integrity engine.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: timestamps, per-faculty check states, loudness samples,
//! violation events, and the tunable integrity-policy parameters.

pub mod check;
pub mod loudness;
pub mod params;
pub mod time;
pub mod violation;

pub use check::{CheckState, Faculty};
pub use loudness::LoudnessSample;
pub use params::{FailureLanePolicy, LivenessPolicy, ProctorParams};
pub use time::Timestamp;
pub use violation::{ViolationEvent, ViolationKind};
