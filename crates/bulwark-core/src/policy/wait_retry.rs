//! Retry with a computed delay before each re-invocation.

use super::backoff::Backoff;
use super::classify::ErrorClassifier;
use super::run::run_with_retry;
use super::{Policy, Wrap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Called before each wait with the handled error, the computed delay and the
/// 1-based retry number.
pub type WaitHandler<E> = Arc<dyn Fn(&E, Duration, u32) + Send + Sync>;

/// Blocks the calling thread for the given duration.
pub type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// Like [`RetryPolicy`](super::RetryPolicy), but waits `backoff.delay(n)`
/// on the calling thread before the n-th retry.
pub struct WaitAndRetryPolicy<E> {
    max_retries: u32,
    classifier: ErrorClassifier<E>,
    backoff: Backoff,
    on_retry: Option<WaitHandler<E>>,
    sleeper: Sleeper,
}

impl<E> Clone for WaitAndRetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            classifier: self.classifier.clone(),
            backoff: self.backoff.clone(),
            on_retry: self.on_retry.clone(),
            sleeper: Arc::clone(&self.sleeper),
        }
    }
}

impl<E> fmt::Debug for WaitAndRetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitAndRetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .field("on_retry", &self.on_retry.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

impl<E: 'static> WaitAndRetryPolicy<E> {
    pub fn new(max_retries: u32, classifier: ErrorClassifier<E>, backoff: Backoff) -> Self {
        Self {
            max_retries,
            classifier,
            backoff,
            on_retry: None,
            sleeper: Arc::new(std::thread::sleep),
        }
    }

    /// Observe each handled failure and the delay about to be waited.
    pub fn on_retry<H>(mut self, handler: H) -> Self
    where
        H: Fn(&E, Duration, u32) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(handler));
        self
    }

    /// Replace `std::thread::sleep` (tests use this to record delays instead of waiting).
    pub fn with_sleeper<S>(mut self, sleeper: S) -> Self
    where
        S: Fn(Duration) + Send + Sync + 'static,
    {
        self.sleeper = Arc::new(sleeper);
        self
    }
}

impl<E> WaitAndRetryPolicy<E> {
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn wrap<I>(self, inner: I) -> Wrap<Self, I> {
        Wrap::new(self, inner)
    }
}

impl<R, E: fmt::Display> Policy<R, E> for WaitAndRetryPolicy<E> {
    fn execute<F>(&self, operation: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        run_with_retry(&self.classifier, self.max_retries, operation, |e, retry| {
            let delay = self.backoff.delay(retry);
            tracing::debug!(
                "retry {}/{} in {:?} after error: {}",
                retry,
                self.max_retries,
                delay,
                e
            );
            if let Some(handler) = &self.on_retry {
                handler(e, delay, retry);
            }
            if !delay.is_zero() {
                (self.sleeper)(delay);
            }
            delay
        })
    }
}
