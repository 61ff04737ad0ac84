//! Token types shared between the auth service and the orchestrator.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

/// Access token plus refresh material returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer token attached to API requests.
    pub access_token: String,
    /// Token exchanged for a new access token when the current one
    /// expires. Absent for sessions the backend does not allow to renew.
    pub refresh_token: Option<String>,
    /// Instant after which the access token is rejected by the backend.
    pub expires_at: DateTime<Utc>,
}

impl TokenSet {
    /// Builds a token set from an access token and its lifetime in
    /// seconds, anchoring expiry at the current time.
    pub fn new(access_token: String, refresh_token: Option<String>, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: Utc::now() + ChronoDuration::seconds(expires_in),
        }
    }

    /// Returns `true` when the access token expires within the given
    /// number of seconds (or has already expired).
    pub fn expires_within(&self, seconds: i64) -> bool {
        self.expires_at <= Utc::now() + ChronoDuration::seconds(seconds)
    }

    /// Seconds until expiry, negative once the token has lapsed.
    pub fn seconds_until_expiry(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }
}

/// Wire shape of the auth endpoints' success responses.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        TokenSet::new(response.token, response.refresh_token, response.expires_in)
    }
}

/// Wire shape of the login request body.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Wire shape of the refresh request body.
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}
