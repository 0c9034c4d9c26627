use std::time::Duration;

use fmconsole_core::{ConsoleConfig, ConsoleError};

/// Capped exponential backoff with a bounded number of attempts.
///
/// Attempt `n` (1-based) that fails with a retryable error waits
/// `min(base * 2^(n-1), max)` before attempt `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first try included. Always at least 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_delay, max_delay }
    }

    /// One attempt, no retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.max_attempts, config.backoff_base, config.backoff_max)
    }

    /// Delay before the attempt following `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << shift)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Whether to try again after `attempt` failed with `err`.
    pub fn should_retry(&self, attempt: u32, err: &ConsoleError) -> bool {
        attempt < self.max_attempts && err.is_retryable()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ConsoleConfig::default())
    }
}
