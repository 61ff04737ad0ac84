//! Shared foundation for the Wayfarer client crates.
//!
//! This crate carries the pieces every Wayfarer component agrees on:
//!
//! - **`error`**: the classified error taxonomy (`ApiError` / `ErrorKind`)
//!   plus the `ErrorClassification` trait used by retry logic, reporting,
//!   and UI mapping.
//! - **`retry`**: exponential-backoff retry with jitter, driven by error
//!   classification rather than blanket retries.
//!
//! Errors are classified exactly once at the HTTP boundary; everything
//! downstream (retry decisions, severity-based logging, user messages)
//! reads the classification instead of re-inspecting causes.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod error;
pub mod retry;

// Re-export commonly used types for convenience
pub use error::{ApiError, ErrorClassification, ErrorKind, ErrorSeverity, FieldError};
pub use retry::{RetryError, RetryResult, RetryStrategy};
