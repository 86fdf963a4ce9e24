//! Scoring report shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum submission length (characters) for an accurate scan.
pub const MIN_TEXT_LEN: usize = 50;

/// AI probability above which a submission is called AI generated.
const AI_VERDICT_THRESHOLD: f32 = 60.0;

/// One matched source fragment reported by the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchedSource {
    pub site: String,
    pub match_percent: f32,
}

/// The service's overall call on a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    LikelyAiGenerated,
    LikelyHumanWritten,
}

impl Verdict {
    /// Derive the verdict from an AI probability percentage.
    pub fn from_ai_probability(percent: f32) -> Self {
        if percent > AI_VERDICT_THRESHOLD {
            Self::LikelyAiGenerated
        } else {
            Self::LikelyHumanWritten
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LikelyAiGenerated => write!(f, "Likely AI Generated"),
            Self::LikelyHumanWritten => write!(f, "Likely Human Written"),
        }
    }
}

/// The scoring service's response for one submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub plagiarism_percent: f32,
    pub ai_probability_percent: f32,
    pub verdict: Verdict,
    pub word_count: u32,
    pub matched_sources: Vec<MatchedSource>,
}
