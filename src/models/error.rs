use thiserror::Error;

/// The only way an estimate can fail: the caller handed us something we
/// cannot price.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EstimateError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EstimateError {
    pub fn invalid(message: impl Into<String>) -> Self {
        EstimateError::InvalidInput(message.into())
    }
}
