use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("environment signal source unavailable: {0}")]
    Unavailable(String),

    #[error("fullscreen is not supported in this environment")]
    FullscreenUnsupported,
}
