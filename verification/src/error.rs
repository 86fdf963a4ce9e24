use thiserror::Error;
use vigil_media::MediaError;
use vigil_types::{CheckState, Faculty};

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("liveness model is not ready")]
    ModelNotReady,

    #[error("microphone signal too low: {level:.1} at threshold {threshold:.1}")]
    InsufficientSignal { level: f32, threshold: f32 },

    #[error("no audio data available at microphone test expiry")]
    NoSignal,

    #[error("no face detected during the scan")]
    NoFaceDetected,

    #[error("check cancelled by the user")]
    Cancelled,

    #[error("stale scan callback rejected")]
    StaleScan,

    #[error("{faculty} lane cannot start a test from state {from}")]
    InvalidTransition { faculty: Faculty, from: CheckState },

    #[error("both lanes must be verified before session start")]
    NotVerified,

    #[error("media error: {0}")]
    Media(#[from] MediaError),
}
