//! Client configuration loaded from the environment.
//!
//! All variables use the `WAYFARER_` prefix. `WAYFARER_API_BASE_URL` is
//! required; the remaining knobs fall back to the defaults below.

use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default request timeout when `WAYFARER_API_TIMEOUT_MS` is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default retry attempt budget when `WAYFARER_API_MAX_ATTEMPTS` is unset.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default offline queue capacity when `WAYFARER_QUEUE_CAPACITY` is unset.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Configuration errors surfaced while loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {name}: {message}")]
    InvalidVar { name: String, message: String },

    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("Failed to construct HTTP client: {0}")]
    HttpClient(String),
}

/// Runtime settings for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Wayfarer API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout covering connect and body transfer.
    pub timeout: Duration,
    /// Total attempt budget for retryable failures.
    pub max_attempts: u32,
    /// Maximum number of queued offline requests.
    pub queue_capacity: usize,
}

impl ClientConfig {
    /// Creates a configuration for the given base URL with default
    /// timeout, retry, and queue settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from the environment, reading a `.env` file
    /// first when one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("WAYFARER_API_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("WAYFARER_API_BASE_URL".to_string()))?;

        let timeout = match read_optional("WAYFARER_API_TIMEOUT_MS")? {
            Some(ms) => Duration::from_millis(parse_var("WAYFARER_API_TIMEOUT_MS", &ms)?),
            None => DEFAULT_TIMEOUT,
        };

        let max_attempts = match read_optional("WAYFARER_API_MAX_ATTEMPTS")? {
            Some(raw) => parse_var("WAYFARER_API_MAX_ATTEMPTS", &raw)?,
            None => DEFAULT_MAX_ATTEMPTS,
        };

        let queue_capacity = match read_optional("WAYFARER_QUEUE_CAPACITY")? {
            Some(raw) => parse_var("WAYFARER_QUEUE_CAPACITY", &raw)?,
            None => DEFAULT_QUEUE_CAPACITY,
        };

        let config = Self { base_url, timeout, max_attempts, queue_capacity };
        config.validate()?;
        Ok(config)
    }

    /// Validates the loaded settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                message: "scheme must be http or https".to_string(),
            });
        }
        if self.base_url.ends_with('/') {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                message: "must not end with a trailing slash".to_string(),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidVar {
                name: "WAYFARER_API_TIMEOUT_MS".to_string(),
                message: "timeout must be greater than zero".to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidVar {
                name: "WAYFARER_API_MAX_ATTEMPTS".to_string(),
                message: "at least one attempt is required".to_string(),
            });
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidVar {
                name: "WAYFARER_QUEUE_CAPACITY".to_string(),
                message: "queue capacity must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn read_optional(name: &str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::InvalidVar { name: name.to_string(), message: e.to_string() }),
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar {
        name: name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates `ClientConfig::new` behavior for the defaults scenario.
    ///
    /// Assertions:
    /// - Confirms default timeout, attempt budget, and queue capacity.
    #[test]
    fn new_applies_default_settings() {
        let config = ClientConfig::new("https://api.example.com").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.queue_capacity, 1000);
    }

    /// Validates `ClientConfig::validate` behavior for the malformed base
    /// URL scenario.
    ///
    /// Assertions:
    /// - Ensures non-URL strings are rejected.
    /// - Ensures non-HTTP schemes are rejected.
    /// - Ensures trailing slashes are rejected.
    #[test]
    fn validate_rejects_bad_base_urls() {
        assert!(ClientConfig::new("not a url").is_err());
        assert!(ClientConfig::new("ftp://api.example.com").is_err());
        assert!(ClientConfig::new("https://api.example.com/").is_err());
    }

    /// Validates `ClientConfig::validate` behavior for the zero-value
    /// settings scenario.
    ///
    /// Assertions:
    /// - Ensures a zero timeout is rejected.
    /// - Ensures a zero attempt budget is rejected.
    /// - Ensures a zero queue capacity is rejected.
    #[test]
    fn validate_rejects_zero_settings() {
        let mut config = ClientConfig::new("https://api.example.com").unwrap();
        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::new("https://api.example.com").unwrap();
        config.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::new("https://api.example.com").unwrap();
        config.queue_capacity = 0;
        assert!(config.validate().is_err());
    }
}
