//! Pre-exam hardware certification.
//!
//! Two independent lanes, composed with AND semantics for the final gate:
//! 1. **Camera**: a fixed-cadence liveness scan. A single positive face
//!    detection anywhere in the scan window verifies the lane (the lenient
//!    policy is named configuration, not an accident).
//! 2. **Microphone**: a fixed 2.5 s window decided by the instantaneous
//!    loudness sample at expiry.
//!
//! The state machine itself is pure and synchronous; the async drivers in
//! [`session`] run the cadenced loops, check cancellation before every
//! state mutation, and guarantee the media handle is released on every
//! exit path.

pub mod cancel;
pub mod error;
pub mod machine;
pub mod session;
pub mod state;

pub use cancel::Canceller;
pub use error::VerificationError;
pub use machine::{
    MicOutcome, MicRejection, ScanTick, TestToken, VerificationEvent, VerificationStateMachine,
};
pub use session::VerificationSession;
pub use state::{ScanSession, VerificationState};
