// Retry module with exponential backoff and jitter, driven by error
// classification

pub mod constants;
pub mod error;
pub mod strategy;

pub use error::{RetryError, RetryResult};
pub use strategy::RetryStrategy;
