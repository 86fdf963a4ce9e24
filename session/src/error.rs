use thiserror::Error;
use vigil_media::MediaError;
use vigil_monitor::SignalError;
use vigil_verification::VerificationError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("hardware not verified — both lanes must pass before the session starts")]
    NotVerified,

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("media error: {0}")]
    Media(#[from] MediaError),

    #[error("signal error: {0}")]
    Signal(#[from] SignalError),
}
