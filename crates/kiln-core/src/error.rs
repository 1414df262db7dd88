use kiln_tracking::TrackingError;
use kiln_training::TrainingError;
use thiserror::Error;

pub type LaunchResult<T> = std::result::Result<T, LaunchError>;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("unknown training backend: {0}")]
    UnknownBackend(String),

    #[error(transparent)]
    Training(#[from] TrainingError),

    #[error(transparent)]
    Tracking(#[from] TrackingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
