// Retry strategy with exponential backoff and jitter
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, error, warn};

use crate::error::ErrorClassification;
use crate::retry::constants::{
    DEFAULT_BASE_DELAY, DEFAULT_JITTER_FACTOR, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY,
    DEFAULT_MULTIPLIER, MAX_BACKOFF_EXPONENT, MAX_MAX_ATTEMPTS, MIN_MAX_ATTEMPTS,
};
use crate::retry::error::{RetryError, RetryResult};

/// Retry strategy with configurable exponential backoff and jitter.
///
/// Retry decisions are delegated to the failing error's
/// [`ErrorClassification::is_retryable`]; the strategy only owns the
/// attempt budget and the delay schedule.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter_factor: f64,
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
            jitter_factor: DEFAULT_JITTER_FACTOR,
        }
    }
}

impl RetryStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a custom retry strategy with validation
    pub fn custom(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
    ) -> RetryResult<Self> {
        if !(MIN_MAX_ATTEMPTS..=MAX_MAX_ATTEMPTS).contains(&max_attempts) {
            return Err(RetryError::invalid_config(format!(
                "max_attempts must be between {} and {}, got {}",
                MIN_MAX_ATTEMPTS, MAX_MAX_ATTEMPTS, max_attempts
            )));
        }

        if base_delay > max_delay {
            return Err(RetryError::invalid_config(format!(
                "base_delay ({:?}) cannot be greater than max_delay ({:?})",
                base_delay, max_delay
            )));
        }

        Ok(Self { max_attempts, base_delay, max_delay, ..Self::default() })
    }

    /// Set the maximum number of attempts with validation
    pub fn with_max_attempts(mut self, attempts: u32) -> RetryResult<Self> {
        if !(MIN_MAX_ATTEMPTS..=MAX_MAX_ATTEMPTS).contains(&attempts) {
            return Err(RetryError::invalid_config(format!(
                "max_attempts must be between {} and {}, got {}",
                MIN_MAX_ATTEMPTS, MAX_MAX_ATTEMPTS, attempts
            )));
        }
        self.max_attempts = attempts;
        Ok(self)
    }

    /// Set the base delay for exponential backoff
    pub fn with_base_delay(mut self, delay: Duration) -> RetryResult<Self> {
        if delay > self.max_delay {
            return Err(RetryError::invalid_config(format!(
                "base_delay ({:?}) cannot be greater than max_delay ({:?})",
                delay, self.max_delay
            )));
        }
        self.base_delay = delay;
        Ok(self)
    }

    /// Set the maximum delay cap
    pub fn with_max_delay(mut self, delay: Duration) -> RetryResult<Self> {
        if delay < self.base_delay {
            return Err(RetryError::invalid_config(format!(
                "max_delay ({:?}) cannot be less than base_delay ({:?})",
                delay, self.base_delay
            )));
        }
        self.max_delay = delay;
        Ok(self)
    }

    /// Set the backoff multiplier applied per attempt
    pub fn with_multiplier(mut self, multiplier: f64) -> RetryResult<Self> {
        if multiplier < 1.0 || !multiplier.is_finite() {
            return Err(RetryError::invalid_config(format!(
                "multiplier must be a finite value >= 1.0, got {}",
                multiplier
            )));
        }
        self.multiplier = multiplier;
        Ok(self)
    }

    /// Set the jitter factor (0.0 = no jitter; 0.2 perturbs delays by ±10%)
    pub fn with_jitter_factor(mut self, factor: f64) -> Self {
        self.jitter_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Calculate the delay before the given retry (0-based attempt index)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponential_delay = self.calculate_exponential_delay(attempt);
        self.apply_jitter(exponential_delay)
    }

    /// Calculate exponential delay without jitter
    fn calculate_exponential_delay(&self, attempt: u32) -> Duration {
        let base_millis = self.base_delay.as_millis() as u64;
        let max_millis = self.max_delay.as_millis() as u64;

        // Cap exponent to prevent overflow
        let exponent = attempt.min(MAX_BACKOFF_EXPONENT);
        let factor = self.multiplier.powi(exponent as i32);

        let delay_millis = ((base_millis as f64) * factor).min(max_millis as f64) as u64;

        Duration::from_millis(delay_millis)
    }

    /// Apply jitter to prevent synchronized retry storms
    fn apply_jitter(&self, delay: Duration) -> Duration {
        if self.jitter_factor == 0.0 {
            return delay;
        }

        let mut rng = rand::thread_rng();
        let delay_millis = delay.as_millis() as f64;
        let jitter_range = delay_millis * self.jitter_factor;

        // Random jitter in -jitter_range/2 ..= +jitter_range/2
        let jitter = rng.gen_range(-jitter_range / 2.0..=jitter_range / 2.0);
        let final_millis = (delay_millis + jitter).max(0.0) as u64;

        Duration::from_millis(final_millis)
    }

    /// Check if another attempt is allowed after the given 0-based attempt
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }

    /// Get the maximum number of attempts
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Execute an operation under this strategy.
    ///
    /// The operation is attempted up to `max_attempts` times. A failure is
    /// retried only while the error reports itself retryable; the last
    /// error is returned unwrapped so callers keep full classification.
    pub async fn execute<F, Fut, T, E>(&self, operation_name: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: ErrorClassification + std::fmt::Display,
    {
        debug!(
            operation = operation_name,
            max_attempts = self.max_attempts,
            "Starting retry operation"
        );

        let mut attempt: u32 = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(
                            operation = operation_name,
                            attempts = attempt + 1,
                            "Retry operation succeeded"
                        );
                    }
                    return Ok(value);
                }
                Err(err) => {
                    if !err.is_retryable() {
                        debug!(
                            operation = operation_name,
                            error = %err,
                            "Error is not retryable"
                        );
                        return Err(err);
                    }

                    if !self.should_retry(attempt) {
                        error!(
                            operation = operation_name,
                            attempts = attempt + 1,
                            error = %err,
                            "All retry attempts failed"
                        );
                        return Err(err);
                    }

                    let delay = err.retry_after().unwrap_or_else(|| self.delay_for(attempt));

                    warn!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        delay = ?delay,
                        error = %err,
                        "Retry attempt failed, backing off"
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
