//! Integration tests for the retry strategy working against the
//! classified error taxonomy.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use wayfarer_common::{ApiError, ErrorClassification, ErrorKind, RetryStrategy};

fn fast_strategy(max_attempts: u32) -> RetryStrategy {
    RetryStrategy::new()
        .with_max_attempts(max_attempts)
        .unwrap()
        .with_base_delay(Duration::from_millis(1))
        .unwrap()
}

/// Validates `RetryStrategy::execute` behavior for the retryable kinds
/// scenario.
///
/// Assertions:
/// - Ensures Network, Timeout, and Server failures each consume the full
///   attempt budget.
#[tokio::test]
async fn retryable_kinds_consume_full_attempt_budget() {
    let make_errors: [fn() -> ApiError; 3] = [
        || ApiError::network("connection reset"),
        || ApiError::timeout("deadline exceeded"),
        || ApiError::server("internal error"),
    ];

    for make_error in make_errors {
        let strategy = fast_strategy(3);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = Arc::clone(&counter);

        let result = strategy
            .execute("integration_op", move || {
                let counter = Arc::clone(&counter_clone);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(make_error())
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }
}

/// Validates `RetryStrategy::execute` behavior for the non-retryable kinds
/// scenario.
///
/// Assertions:
/// - Ensures Authentication, Authorization, Validation, and Offline
///   failures are attempted exactly once.
#[tokio::test]
async fn non_retryable_kinds_attempted_exactly_once() {
    let make_errors: [fn() -> ApiError; 4] = [
        || ApiError::authentication("token rejected"),
        || ApiError::authorization("forbidden"),
        || ApiError::validation("bad input", vec![]),
        || ApiError::offline("no connectivity"),
    ];

    for make_error in make_errors {
        let strategy = fast_strategy(5);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = Arc::clone(&counter);

        let result = strategy
            .execute("integration_op", move || {
                let counter = Arc::clone(&counter_clone);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(make_error())
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}

/// Validates `RetryStrategy::delay_for` behavior for the schedule shape
/// scenario.
///
/// Assertions:
/// - Ensures delays without jitter increase strictly until the cap.
/// - Ensures no delay exceeds the configured maximum.
#[test]
fn delay_schedule_increases_then_caps() {
    let strategy = RetryStrategy::new().with_jitter_factor(0.0);

    let mut previous = Duration::ZERO;
    let mut capped = false;
    for attempt in 0..8 {
        let delay = strategy.delay_for(attempt);
        assert!(delay <= Duration::from_secs(10));
        if delay == previous {
            capped = true;
        } else {
            assert!(delay > previous, "delay should grow until the cap");
            assert!(!capped, "delays must not grow again after capping");
        }
        previous = delay;
    }
    assert!(capped, "schedule should reach the cap within 8 attempts");
}

/// Validates the retry exhaustion error surface for the classification
/// round-trip scenario.
///
/// Assertions:
/// - Confirms the surfaced error keeps its original kind.
/// - Ensures the surfaced error still reports itself retryable.
#[tokio::test]
async fn exhausted_retries_surface_last_classified_error() {
    let strategy = fast_strategy(3);

    let result = strategy
        .execute("integration_op", || async { Err::<(), _>(ApiError::server("boom")) })
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert!(err.is_retryable());
}
