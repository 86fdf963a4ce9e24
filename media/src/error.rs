use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no capture device available: {0}")]
    DeviceUnavailable(String),

    #[error("device permission denied by the user")]
    PermissionDenied,

    #[error("liveness model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("audio analysis is not supported in this environment")]
    MeterUnsupported,

    #[error("media handle has already been released")]
    HandleReleased,
}
