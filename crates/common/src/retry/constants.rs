// Constants for retry module
use std::time::Duration;

/// Default maximum number of attempts (initial try + retries)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for exponential backoff
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Default maximum delay cap
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

/// Default backoff multiplier applied per attempt
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Default jitter factor (0.0 = no jitter; 0.2 = delays perturbed by ±10%)
pub const DEFAULT_JITTER_FACTOR: f64 = 0.2;

/// Maximum exponent for exponential backoff calculation to prevent overflow
pub const MAX_BACKOFF_EXPONENT: u32 = 30;

/// Minimum allowed max_attempts value
pub const MIN_MAX_ATTEMPTS: u32 = 1;

/// Maximum allowed max_attempts value
pub const MAX_MAX_ATTEMPTS: u32 = 100;
