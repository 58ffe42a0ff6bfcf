//! Per-execution attempt state.

use std::time::Duration;

/// State of a single `execute` call: retries performed so far, total time
/// spent waiting between attempts, and the most recent handled error.
///
/// Created fresh for every call and dropped when it returns, so one policy can
/// serve any number of concurrent executions.
#[derive(Debug)]
pub struct AttemptContext<E> {
    retries: u32,
    elapsed_delay: Duration,
    last_error: Option<E>,
}

impl<E> AttemptContext<E> {
    pub fn new() -> Self {
        Self {
            retries: 0,
            elapsed_delay: Duration::ZERO,
            last_error: None,
        }
    }

    /// Retries performed so far (0 during the first attempt).
    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn elapsed_delay(&self) -> Duration {
        self.elapsed_delay
    }

    pub fn last_error(&self) -> Option<&E> {
        self.last_error.as_ref()
    }

    /// Record a handled failure followed by a retry after `delay`.
    pub fn record_retry(&mut self, error: E, delay: Duration) {
        self.retries += 1;
        self.elapsed_delay = self.elapsed_delay.saturating_add(delay);
        self.last_error = Some(error);
    }
}

impl<E> Default for AttemptContext<E> {
    fn default() -> Self {
        Self::new()
    }
}
