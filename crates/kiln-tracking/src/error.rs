use thiserror::Error;

pub type TrackingResult<T> = std::result::Result<T, TrackingError>;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("request error: {0}")]
    Request(String),

    #[error("tracking service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("artifact error: {0}")]
    Artifact(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
