//! Retry configuration and policy helpers for API requests.

use backon::ExponentialBuilder;
use tokio::time::Duration;

use crate::error::Error;

/// Configuration for retrying failed requests.
#[derive(Clone, Copy, Debug)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    pub attempts: usize,
    /// Base delay for the exponential backoff.
    pub base_delay: Duration,
    /// Whether to jitter the backoff delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            base_delay: Duration::from_millis(200),
            jitter: true,
        }
    }
}

/// Build an exponential backoff retry builder from the given configuration.
///
/// The builder uses the configured attempt count and base delay, and applies
/// jitter when enabled.
#[must_use]
pub fn build_retry_builder(config: RetryConfig) -> ExponentialBuilder {
    let builder = ExponentialBuilder::default()
        .with_min_delay(config.base_delay)
        .with_max_times(config.attempts);
    if config.jitter {
        builder.with_jitter()
    } else {
        builder
    }
}

/// Determines whether an [`Error`] is transient and should be retried.
///
/// Transport failures and explicit throttling are retryable. Every other
/// outcome, including non-2xx API errors and schema mismatches, fails the
/// call immediately.
#[must_use]
pub fn should_retry(err: &Error) -> bool {
    matches!(err, Error::Transport { .. } | Error::RateLimited { .. })
}

/// Override the computed backoff delay when the server supplied a
/// `Retry-After` signal.
///
/// A `None` backoff means the retry budget is exhausted; that is never
/// overridden so throttling cannot extend the budget.
#[must_use]
pub fn adjust_delay(err: &Error, backoff: Option<Duration>) -> Option<Duration> {
    match (err, backoff) {
        (
            Error::RateLimited {
                retry_after: Some(wait),
                ..
            },
            Some(_),
        ) => Some(*wait),
        _ => backoff,
    }
}
