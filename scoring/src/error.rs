use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("submission too short: {length} characters, minimum {minimum}")]
    TooShort { length: usize, minimum: usize },

    #[error("scoring service error: {0}")]
    Service(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
