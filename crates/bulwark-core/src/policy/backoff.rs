//! Backoff functions: retry number to delay.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Pure function from a 1-based retry number to the delay before that retry.
///
/// The shape of the backoff (growth, cap, jitter) lives entirely in the
/// function; the wait-and-retry policy only calls it.
#[derive(Clone)]
pub struct Backoff {
    delay_fn: Arc<dyn Fn(u32) -> Duration + Send + Sync>,
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backoff").finish_non_exhaustive()
    }
}

impl Backoff {
    pub fn from_fn<F>(delay_fn: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Self {
            delay_fn: Arc::new(delay_fn),
        }
    }

    /// `base * 2^attempt`, so with a 100ms base: 200ms, 400ms, 800ms, ...
    ///
    /// No cap and no jitter; saturates at `Duration::MAX`.
    pub fn exponential(base: Duration) -> Self {
        Self::from_fn(move |attempt| scale_pow2(base, attempt))
    }

    /// Same delay before every retry.
    pub fn constant(delay: Duration) -> Self {
        Self::from_fn(move |_| delay)
    }

    /// Limit every delay produced by this backoff to `max`.
    pub fn capped(self, max: Duration) -> Self {
        Self::from_fn(move |attempt| self.delay(attempt).min(max))
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        (self.delay_fn)(attempt)
    }
}

/// `base * 2^exp`, computed in nanoseconds; `Duration::MAX` when it does not fit.
fn scale_pow2(base: Duration, exp: u32) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let nanos = base.as_nanos();
    if nanos == 0 {
        return Duration::ZERO;
    }
    if exp >= nanos.leading_zeros() {
        return Duration::MAX;
    }
    let scaled = nanos << exp;
    match u64::try_from(scaled / NANOS_PER_SEC) {
        Ok(secs) => Duration::new(secs, (scaled % NANOS_PER_SEC) as u32),
        Err(_) => Duration::MAX,
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::exponential(Duration::from_millis(100))
    }
}
