//! Contract for the external plagiarism / AI-content scoring service.
//!
//! The engine treats the classifier as an opaque black box: only the
//! input-length precondition and the output shape are part of the
//! contract. The statistical design of the classifier itself lives on the
//! service side.

pub mod client;
pub mod error;
pub mod report;

pub use client::{HttpScorer, IntegrityScorer};
pub use error::ScoringError;
pub use report::{MatchedSource, ScoreReport, Verdict, MIN_TEXT_LEN};
