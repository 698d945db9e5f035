use thiserror::Error;

use crate::logging::LoggingError;
use crate::runtime::shared_state::SharedStateError;

/// Unified result type for the slider gaps crate.
pub type Result<T> = std::result::Result<T, SliderError>;

/// Errors surfaced at the configuration and runtime seams.
///
/// The gap math itself never fails; these only come from loading settings,
/// resolving event names, or the ambient plumbing around components.
#[derive(Debug, Error)]
pub enum SliderError {
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("unknown event `{0}`")]
    UnknownEvent(String),
    #[error("shared state error: {0}")]
    SharedState(#[from] SharedStateError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SliderError {
    fn from(err: serde_json::Error) -> Self {
        SliderError::InvalidSettings(err.to_string())
    }
}
