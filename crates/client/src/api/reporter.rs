//! Error reporting hook.
//!
//! Every classified error that reaches a caller passes through the
//! configured [`ErrorReporter`] first. The default implementation logs
//! through `tracing` at a level derived from the error's severity;
//! applications can substitute their own sink (crash reporting, metrics).

use tracing::{debug, error, warn};
use wayfarer_common::{ApiError, ErrorClassification, ErrorSeverity};

/// Sink for classified errors surfaced by the client.
pub trait ErrorReporter: Send + Sync {
    /// Called once per failed operation, before the error is returned.
    fn report(&self, endpoint: &str, error: &ApiError);
}

/// Reporter that logs through `tracing`, mapping severity onto levels.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, endpoint: &str, err: &ApiError) {
        match err.severity() {
            ErrorSeverity::Info => {
                debug!(endpoint, kind = %err.kind(), code = err.code(), "{}", err.message());
            }
            ErrorSeverity::Warning => {
                warn!(endpoint, kind = %err.kind(), code = err.code(), "{}", err.message());
            }
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                error!(endpoint, kind = %err.kind(), code = err.code(), "{}", err.message());
            }
        }
    }
}
