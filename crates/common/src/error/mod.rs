//! Classified error taxonomy for the Wayfarer client.
//!
//! Every failure the client can observe is normalized into an [`ApiError`]
//! carrying one of a fixed set of [`ErrorKind`]s. Classification happens
//! once, at the HTTP boundary; downstream code never re-inspects causes.
//!
//! The taxonomy is deliberately a struct with a kind tag rather than a
//! variant-per-kind enum: all kinds share the same payload (message,
//! optional backend code, optional field-level detail, optional wrapped
//! cause), and callers switch on `kind` alone.
//!
//! # ErrorClassification
//!
//! All error types that participate in retry decisions implement
//! [`ErrorClassification`]:
//!
//! - **`is_retryable()`**: may the operation be attempted again?
//! - **`severity()`**: how serious is this? (Info/Warning/Error/Critical)
//! - **`is_critical()`**: does this require immediate attention?
//! - **`retry_after()`**: suggested retry delay, if any

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed set of error kinds the client classifies failures into.
///
/// The set is closed on purpose: retry policy, severity mapping, and user
/// messaging are all total functions over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Connection failures, DNS errors, dropped sockets
    Network,
    /// Missing, expired, or rejected credentials (401)
    Authentication,
    /// Authenticated but not permitted (403)
    Authorization,
    /// Request rejected by input validation (400)
    Validation,
    /// Backend failure (5xx)
    Server,
    /// Per-attempt deadline exceeded, or 408/504 from the backend
    Timeout,
    /// No connectivity; the request never reached the network
    Offline,
    /// Anything that fits no other kind
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "NETWORK"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Server => write!(f, "SERVER"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Offline => write!(f, "OFFLINE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Field-level validation detail attached to [`ErrorKind::Validation`]
/// errors.
///
/// Deserialized from the backend's validation error bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// A classified client error.
///
/// Immutable once constructed. Built through the per-kind constructors
/// (`ApiError::network`, `ApiError::validation`, ...) plus the fluent
/// `with_code` / `with_source` extenders.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    code: Option<String>,
    field_errors: Vec<FieldError>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), code: None, field_errors: Vec::new(), source: None }
    }

    /// Create a network error (connection refused, DNS failure, ...)
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// Create an authentication error (401, refresh failure)
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an authorization error (403)
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a validation error with field-level detail
    pub fn validation(message: impl Into<String>, field_errors: Vec<FieldError>) -> Self {
        Self { field_errors, ..Self::new(ErrorKind::Validation, message) }
    }

    /// Create a server error (5xx)
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, message)
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create an offline error (request never reached the network)
    pub fn offline(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Offline, message)
    }

    /// Create an unknown error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    /// Attach a backend-assigned error code
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the underlying cause
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// The classified kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The diagnostic message (for logs, not for end users)
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Backend-assigned error code, if any
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Field-level validation detail (empty for non-validation kinds)
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// A user-facing message appropriate to the kind.
    ///
    /// Always non-empty; validation errors prefer the first field message
    /// so forms can show something actionable.
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            ErrorKind::Authentication => "Your session has expired. Please sign in again.".to_string(),
            ErrorKind::Authorization => {
                "You don't have permission to perform this action.".to_string()
            }
            ErrorKind::Validation => self
                .field_errors
                .first()
                .map(|fe| format!("{}: {}", fe.field, fe.message))
                .unwrap_or_else(|| "Some of the entered details are invalid.".to_string()),
            ErrorKind::Server => "Something went wrong on our side. Please try again.".to_string(),
            ErrorKind::Timeout => "The request took too long. Please try again.".to_string(),
            ErrorKind::Offline => {
                "You're offline. Changes will be sent when you reconnect.".to_string()
            }
            ErrorKind::Unknown => "An unexpected error occurred.".to_string(),
        }
    }
}

impl ErrorClassification for ApiError {
    /// Only transient failures are retryable
    fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Server)
    }

    fn severity(&self) -> ErrorSeverity {
        match self.kind {
            ErrorKind::Network => ErrorSeverity::Warning,
            ErrorKind::Authentication => ErrorSeverity::Warning,
            ErrorKind::Authorization => ErrorSeverity::Warning,
            ErrorKind::Validation => ErrorSeverity::Error,
            ErrorKind::Server => ErrorSeverity::Error,
            ErrorKind::Timeout => ErrorSeverity::Warning,
            ErrorKind::Offline => ErrorSeverity::Info,
            ErrorKind::Unknown => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error classification trait for consistent handling across modules.
///
/// Implemented by every error type that participates in retry decisions,
/// enabling uniform retry logic, monitoring, and alerting.
pub trait ErrorClassification {
    /// Check if this error is retryable.
    ///
    /// Retryable errors are transient conditions that may succeed if
    /// attempted again: network blips, timeouts, backend 5xx responses.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level, used for logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this error requires immediate attention.
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay, if one applies (e.g. from a
    /// Retry-After header). `None` means the caller's backoff policy
    /// decides.
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, expected conditions
    Info,
    /// Degraded but operational
    Warning,
    /// Failure requiring attention
    Error,
    /// Immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the error taxonomy.
    use super::*;

    /// Validates `ApiError` constructors for the kind tagging scenario.
    ///
    /// Assertions:
    /// - Confirms each constructor tags the expected `ErrorKind`.
    #[test]
    fn test_constructors_tag_kind() {
        assert_eq!(ApiError::network("x").kind(), ErrorKind::Network);
        assert_eq!(ApiError::authentication("x").kind(), ErrorKind::Authentication);
        assert_eq!(ApiError::authorization("x").kind(), ErrorKind::Authorization);
        assert_eq!(ApiError::validation("x", vec![]).kind(), ErrorKind::Validation);
        assert_eq!(ApiError::server("x").kind(), ErrorKind::Server);
        assert_eq!(ApiError::timeout("x").kind(), ErrorKind::Timeout);
        assert_eq!(ApiError::offline("x").kind(), ErrorKind::Offline);
        assert_eq!(ApiError::unknown("x").kind(), ErrorKind::Unknown);
    }

    /// Validates `ApiError::is_retryable` behavior for the retryability
    /// table scenario.
    ///
    /// Assertions:
    /// - Ensures Network/Timeout/Server are retryable.
    /// - Ensures all other kinds are not retryable.
    #[test]
    fn test_retryability_table() {
        assert!(ApiError::network("x").is_retryable());
        assert!(ApiError::timeout("x").is_retryable());
        assert!(ApiError::server("x").is_retryable());

        assert!(!ApiError::authentication("x").is_retryable());
        assert!(!ApiError::authorization("x").is_retryable());
        assert!(!ApiError::validation("x", vec![]).is_retryable());
        assert!(!ApiError::offline("x").is_retryable());
        assert!(!ApiError::unknown("x").is_retryable());
    }

    /// Validates `ApiError::user_message` behavior for the non-empty
    /// message scenario.
    ///
    /// Assertions:
    /// - Ensures every kind produces a non-empty user message.
    #[test]
    fn test_user_message_non_empty_for_every_kind() {
        let errors = [
            ApiError::network("x"),
            ApiError::authentication("x"),
            ApiError::authorization("x"),
            ApiError::validation("x", vec![]),
            ApiError::server("x"),
            ApiError::timeout("x"),
            ApiError::offline("x"),
            ApiError::unknown("x"),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {}", err.kind());
        }
    }

    /// Validates `ApiError::user_message` behavior for the validation
    /// field detail scenario.
    ///
    /// Assertions:
    /// - Ensures the first field error surfaces in the user message.
    #[test]
    fn test_validation_user_message_prefers_field_detail() {
        let err = ApiError::validation(
            "Validation failed",
            vec![FieldError { field: "email".to_string(), message: "is required".to_string() }],
        );

        assert!(err.user_message().contains("email"));
        assert!(err.user_message().contains("is required"));
    }

    /// Validates `ApiError::with_code` and `with_source` behavior for the
    /// fluent extension scenario.
    ///
    /// Assertions:
    /// - Confirms `err.code()` equals `Some("TRIP_LOCKED")`.
    /// - Ensures a wrapped cause is reachable through `source()`.
    #[test]
    fn test_with_code_and_source() {
        use std::error::Error as _;

        let cause = std::io::Error::other("socket closed");
        let err = ApiError::network("request failed").with_code("TRIP_LOCKED").with_source(cause);

        assert_eq!(err.code(), Some("TRIP_LOCKED"));
        assert!(err.source().is_some());
    }

    /// Validates `ErrorKind` serde behavior for the wire format scenario.
    ///
    /// Assertions:
    /// - Confirms kinds serialize to SCREAMING_SNAKE_CASE strings.
    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ErrorKind::Offline).unwrap();
        assert_eq!(json, "\"OFFLINE\"");
    }

    /// Validates `ApiError::severity` behavior for the severity mapping
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `ApiError::offline("x").severity()` equals `Info`.
    /// - Confirms `ApiError::server("x").severity()` equals `Error`.
    /// - Ensures no kind is critical.
    #[test]
    fn test_severity_mapping() {
        assert_eq!(ApiError::offline("x").severity(), ErrorSeverity::Info);
        assert_eq!(ApiError::server("x").severity(), ErrorSeverity::Error);
        assert!(!ApiError::server("x").is_critical());
    }
}
