//! Auth service backed by the Wayfarer auth endpoints.
//!
//! Holds the current [`TokenSet`] behind an async `RwLock` and exposes
//! it to the orchestrator through [`AccessTokenProvider`]. Tokens that
//! expire within [`REFRESH_THRESHOLD_SECONDS`] are renewed before use.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::traits::AccessTokenProvider;
use super::types::{LoginRequest, RefreshRequest, TokenResponse, TokenSet};

/// Tokens expiring within this window are refreshed proactively.
pub const REFRESH_THRESHOLD_SECONDS: i64 = 60;

/// Errors produced by the auth service
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Credentials rejected: {0}")]
    InvalidCredentials(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Auth request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Manages login, logout, and token refresh against the auth endpoints.
pub struct AuthService {
    http: reqwest::Client,
    base_url: String,
    tokens: RwLock<Option<TokenSet>>,
}

impl AuthService {
    /// Creates a service for the given API base URL.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into(), tokens: RwLock::new(None) }
    }

    /// Creates a service seeded with an existing token set, e.g. one
    /// restored from platform storage by the embedding application.
    pub fn with_tokens(http: reqwest::Client, base_url: impl Into<String>, tokens: TokenSet) -> Self {
        Self { http, base_url: base_url.into(), tokens: RwLock::new(Some(tokens)) }
    }

    /// Exchanges credentials for a token set and stores it.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenSet, AuthError> {
        let url = format!("{}/auth/login", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Login rejected");
            return Err(AuthError::InvalidCredentials(format!("status {status}: {body}")));
        }

        let token_set: TokenSet = response.json::<TokenResponse>().await?.into();
        debug!(
            expires_in = token_set.seconds_until_expiry(),
            "Login succeeded, tokens stored"
        );
        *self.tokens.write().await = Some(token_set.clone());
        Ok(token_set)
    }

    /// Drops the stored tokens and notifies the backend. Local state is
    /// cleared even when the backend call fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let tokens = self.tokens.write().await.take();

        if let Some(tokens) = tokens {
            let url = format!("{}/auth/logout", self.base_url);
            let result = self
                .http
                .post(&url)
                .bearer_auth(&tokens.access_token)
                .send()
                .await;
            if let Err(e) = result {
                warn!(error = %e, "Logout request failed, local session cleared anyway");
            }
        }
        Ok(())
    }

    /// Returns `true` when a token set is stored.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    /// Returns a copy of the stored token set, if any.
    pub async fn tokens(&self) -> Option<TokenSet> {
        self.tokens.read().await.clone()
    }

    /// Exchanges the stored refresh token for a new token set.
    async fn refresh_tokens(&self) -> Result<TokenSet, AuthError> {
        let refresh_token = {
            let guard = self.tokens.read().await;
            let tokens = guard.as_ref().ok_or(AuthError::NotAuthenticated)?;
            tokens.refresh_token.clone().ok_or(AuthError::NoRefreshToken)?
        };

        let url = format!("{}/auth/refresh", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&RefreshRequest { refresh_token: &refresh_token })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            // A rejected refresh token means the session is over; keeping
            // the stale tokens would loop every request through refresh.
            *self.tokens.write().await = None;
            warn!(status = %status, "Token refresh rejected, session cleared");
            return Err(AuthError::RefreshFailed(format!("status {status}")));
        }

        let token_set: TokenSet = response.json::<TokenResponse>().await?.into();
        debug!(
            expires_in = token_set.seconds_until_expiry(),
            "Tokens refreshed"
        );
        *self.tokens.write().await = Some(token_set.clone());
        Ok(token_set)
    }
}

#[async_trait]
impl AccessTokenProvider for AuthService {
    async fn access_token(&self) -> Result<Option<String>, AuthError> {
        let needs_refresh = {
            let guard = self.tokens.read().await;
            match guard.as_ref() {
                None => return Ok(None),
                Some(tokens) => {
                    tokens.expires_within(REFRESH_THRESHOLD_SECONDS)
                        && tokens.refresh_token.is_some()
                }
            }
        };

        if needs_refresh {
            let refreshed = self.refresh_tokens().await?;
            return Ok(Some(refreshed.access_token));
        }

        Ok(self.tokens.read().await.as_ref().map(|t| t.access_token.clone()))
    }

    async fn refresh(&self) -> Result<(), AuthError> {
        self.refresh_tokens().await.map(|_| ())
    }
}
