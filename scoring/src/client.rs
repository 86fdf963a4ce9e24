//! Scoring service client.

use crate::error::ScoringError;
use crate::report::{ScoreReport, MIN_TEXT_LEN};
use async_trait::async_trait;
use serde::Serialize;

/// Scores a submission for plagiarism and AI-generated content.
#[async_trait]
pub trait IntegrityScorer: Send + Sync {
    /// Score the submission. Rejects input shorter than [`MIN_TEXT_LEN`]
    /// characters without contacting the service.
    async fn score(&self, text: &str) -> Result<ScoreReport, ScoringError>;
}

/// Enforce the input-length precondition shared by every scorer.
pub fn validate_length(text: &str) -> Result<(), ScoringError> {
    let length = text.chars().count();
    if length < MIN_TEXT_LEN {
        return Err(ScoringError::TooShort {
            length,
            minimum: MIN_TEXT_LEN,
        });
    }
    Ok(())
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    text: &'a str,
}

/// HTTP client for a remote scoring service.
pub struct HttpScorer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpScorer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl IntegrityScorer for HttpScorer {
    async fn score(&self, text: &str) -> Result<ScoreReport, ScoringError> {
        validate_length(text)?;

        tracing::debug!(chars = text.chars().count(), "submitting text for scoring");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ScoreRequest { text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScoringError::Service(format!(
                "unexpected status {}",
                response.status()
            )));
        }
        Ok(response.json::<ScoreReport>().await?)
    }
}
