//! Retry policy for contended writes.
//!
//! Two processes (the CLI and the server) can open the same database file.
//! `BEGIN IMMEDIATE` then fails with `SQLITE_BUSY` once the busy timeout is
//! exhausted; those attempts are retried with exponential backoff. Inside a
//! transaction, a generated participant identifier that collides with an
//! existing one raises the counter to the highest suffix in use and is
//! retried, up to `max_attempts` times.

use std::time::Duration;

/// Configuration for retry behavior on contended writes.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(20),
            max_delay: Duration::from_millis(500),
        }
    }
}

impl RetryConfig {
    /// Delay to wait after the given failed attempt (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Detect lock contention that resolves once the other writer commits.
///
/// The predicate is narrow so genuine SQL or constraint errors are never
/// retried.
pub fn is_busy_error(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("database is locked") || msg.contains("SQLITE_BUSY")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff(1), Duration::from_millis(20));
        assert_eq!(config.backoff(2), Duration::from_millis(40));
        assert_eq!(config.backoff(3), Duration::from_millis(80));
        assert_eq!(config.backoff(30), Duration::from_millis(500));
    }
}
