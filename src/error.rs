//! Error type shared by the tracking core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackingError>;

#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Invalid bounding box {bbox:?}: {reason}")]
    InvalidBox { bbox: [f32; 4], reason: &'static str },
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
    #[error("Tracker `{0}` is not supported")]
    UnsupportedTracker(String),
    #[error("Unknown tracker type `{0}`")]
    UnknownTracker(String),
    #[error("Tracker was updated before being initialized")]
    UninitializedTracker,
    #[error("Malformed tracker config: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
