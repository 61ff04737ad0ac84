//! Wayfarer API client.
//!
//! Request orchestration for the Wayfarer travel backend: bearer
//! authentication with a single refresh-and-retry cycle on 401,
//! exponential-backoff retry for transient failures, an offline queue
//! for mutating requests, and a fixed error taxonomy shared through
//! `wayfarer-common`.

#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod config;
pub mod connectivity;
pub mod queue;

pub use api::classify::{classify_status, classify_transport};
pub use api::client::{ApiClient, ApiClientBuilder};
pub use api::reporter::{ErrorReporter, TracingReporter};
pub use api::response::ApiResponse;
pub use auth::service::{AuthError, AuthService};
pub use auth::traits::AccessTokenProvider;
pub use auth::types::TokenSet;
pub use config::{ClientConfig, ConfigError};
pub use connectivity::{AlwaysOnline, ConnectivityMonitor, SharedConnectivity};
pub use queue::core::OfflineQueue;
pub use queue::types::{MultipartPayload, QueueError, QueuedRequest, ReplayTicket, RequestBody};
