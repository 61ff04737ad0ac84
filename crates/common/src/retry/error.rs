// Error types for retry module
use thiserror::Error;

/// Errors produced while building or validating a retry strategy.
///
/// Execution failures are not wrapped: `RetryStrategy::execute` surfaces
/// the operation's own (classified) error so callers keep full detail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RetryError {
    #[error("Invalid retry configuration: {message}")]
    InvalidConfig { message: String },
}

impl RetryError {
    /// Create a configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }
}

/// Result type for retry configuration
pub type RetryResult<T> = Result<T, RetryError>;
