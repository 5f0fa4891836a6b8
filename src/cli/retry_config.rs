//! Retry configuration for the upload batch.
//!
//! A batch is attempted up to `max_attempts` times; after the n-th failure
//! the loop waits n² seconds.

use std::time::Duration;

/// Attempts made when nothing else is configured
pub const DEFAULT_MAX_ATTEMPTS: u32 = 9;

/// Upper bound accepted for `max_attempts`
pub const MAX_ATTEMPTS_LIMIT: u32 = 20;

/// Attempt limit and backoff schedule for batch retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` clamped to `1..=MAX_ATTEMPTS_LIMIT`
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        let clamped = max_attempts.clamp(1, MAX_ATTEMPTS_LIMIT);
        if clamped != max_attempts {
            log::warn!("max attempts {max_attempts} out of range, using {clamped}");
        }
        Self {
            max_attempts: clamped,
        }
    }

    /// Total attempts allowed, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait after the `attempt`-th failure (1-based): `attempt²` seconds
    pub fn delay_after(&self, attempt: u32) -> Duration {
        Duration::from_secs(u64::from(attempt).saturating_pow(2))
    }
}
