//! Session gating and the live exam session.
//!
//! [`gate`] holds the pure decision functions: whether the assessment may
//! start (both lanes verified, no partial start) and whether the violation
//! tally has crossed the externally supplied escalation policy.
//!
//! [`ExamSession`] is the session-scoped context object: it owns the
//! certified media handle, the violation monitor, the signal registration
//! and the fullscreen lock, with guaranteed symmetric setup/teardown on
//! every exit path.

pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod logging;

pub use config::ProctorConfig;
pub use context::{ExamSession, SessionReport};
pub use error::SessionError;
pub use gate::{can_start, should_auto_escalate, EscalationPolicy};
pub use logging::{init_logging, LogFormat};
