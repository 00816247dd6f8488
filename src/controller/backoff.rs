//! # Fibonacci Backoff
//!
//! Progressive retry delays for failing reconciliations. The sequence is
//! calculated in minutes (1m, 1m, 2m, 3m, 5m, 8m, capped) and returned in
//! seconds, growing more gently than exponential backoff.

use std::time::Duration;

/// Fibonacci backoff calculator.
///
/// Each delay is the sum of the previous two, starting from `min_minutes`
/// and capped at `max_minutes`.
///
/// # Example
///
/// ```
/// use config_sync_controller::controller::backoff::FibonacciBackoff;
///
/// let mut backoff = FibonacciBackoff::new(1, 10);
/// assert_eq!(backoff.next_backoff_seconds(), 60);
/// assert_eq!(backoff.next_backoff_seconds(), 60);
/// assert_eq!(backoff.next_backoff_seconds(), 120);
/// ```
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    min_minutes: u64,
    prev_minutes: u64,
    current_minutes: u64,
    max_minutes: u64,
}

impl FibonacciBackoff {
    #[must_use]
    pub fn new(min_minutes: u64, max_minutes: u64) -> Self {
        Self {
            min_minutes,
            prev_minutes: 0,
            current_minutes: min_minutes,
            max_minutes,
        }
    }

    /// Return the current delay in seconds and advance the sequence.
    pub fn next_backoff_seconds(&mut self) -> u64 {
        let result_seconds = self.current_minutes * 60;

        let next_minutes = self.prev_minutes + self.current_minutes;
        self.prev_minutes = self.current_minutes;
        self.current_minutes = std::cmp::min(next_minutes, self.max_minutes);

        result_seconds
    }

    /// Return the current delay as a [`Duration`] and advance the sequence.
    #[must_use]
    pub fn next_backoff(&mut self) -> Duration {
        Duration::from_secs(self.next_backoff_seconds())
    }

    /// Restart the sequence, used after a successful reconciliation.
    pub fn reset(&mut self) {
        self.prev_minutes = 0;
        self.current_minutes = self.min_minutes;
    }
}
