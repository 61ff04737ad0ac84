// API surface: response envelope, error classification, reporting, and
// the request orchestrator

pub mod classify;
pub mod client;
pub mod reporter;
pub mod response;

pub use classify::{classify_status, classify_transport};
pub use client::{ApiClient, ApiClientBuilder};
pub use reporter::{ErrorReporter, TracingReporter};
pub use response::ApiResponse;
