//! Retry policy for transient request failures.
//!
//! This module provides the [`RetryPolicy`] type describing bounded
//! exponential backoff: a fixed maximum attempt count and an initial delay
//! that doubles on each retry, with no jitter.

use std::time::Duration;

use crate::config::CatalogConfig;

/// Bounded exponential backoff policy.
///
/// The delay before retry `n` (zero-based) is `initial_backoff * 2^n`, so
/// with the defaults (4 attempts, 2s initial) the waits are 2s, 4s and 8s.
///
/// # Example
///
/// ```rust
/// use gfn_datafeed::clients::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(4, Duration::from_secs(2));
/// assert_eq!(policy.delay_for(0), Duration::from_secs(2));
/// assert_eq!(policy.delay_for(2), Duration::from_secs(8));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    max_attempts: u32,
    /// Delay before the first retry.
    initial_backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt bound and initial delay.
    #[must_use]
    pub const fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
        }
    }

    /// Creates a policy from the pipeline configuration.
    #[must_use]
    pub const fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.max_attempts(), config.initial_backoff())
    }

    /// Returns the maximum number of attempts, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay to wait after the given failed attempt.
    ///
    /// `attempt` is zero-based: `delay_for(0)` is the wait between the first
    /// failure and the first retry.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}
