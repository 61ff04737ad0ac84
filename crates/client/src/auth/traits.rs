//! Trait boundary between the orchestrator and the auth layer.

use async_trait::async_trait;

use super::service::AuthError;

/// Supplies bearer tokens to the request orchestrator and performs the
/// refresh cycle triggered by a 401 response.
///
/// Implementations must be safe to call from concurrent requests; the
/// orchestrator does not serialize access.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Returns the current access token, or `None` for anonymous
    /// sessions. Implementations may renew an expiring token before
    /// returning it.
    async fn access_token(&self) -> Result<Option<String>, AuthError>;

    /// Exchanges the refresh token for a new access token. Called once
    /// per request when the backend answers 401.
    async fn refresh(&self) -> Result<(), AuthError>;
}
