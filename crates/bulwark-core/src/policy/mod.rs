//! Resilience policies.
//!
//! A [`Policy`] executes a fallible operation under a failure-handling
//! strategy: run once ([`NoPolicy`]), retry immediately ([`RetryPolicy`]),
//! retry after a backoff delay ([`WaitAndRetryPolicy`]), substitute a value
//! ([`FallbackPolicy`]), or nest one policy inside another ([`Wrap`]).
//!
//! Every policy is immutable once built. Per-call state lives in an
//! [`AttemptContext`] owned by the `execute` call, so a single policy can be
//! shared across threads and reused without limit.

mod backoff;
mod classify;
mod context;
mod fallback;
mod kind;
mod noop;
mod retry;
mod run;
mod wait_retry;
mod wrap;

pub use backoff::Backoff;
pub use classify::{ErrorClassifier, ErrorKind, Tagged};
pub use context::AttemptContext;
pub use fallback::{FallbackHandler, FallbackPolicy, FallbackProducer};
pub use kind::{AnyPolicy, PolicyKind};
pub use noop::NoPolicy;
pub use retry::{RetryHandler, RetryPolicy};
pub use wait_retry::{Sleeper, WaitAndRetryPolicy, WaitHandler};
pub use wrap::Wrap;

use std::sync::Arc;

/// Executes an operation under a failure-handling strategy.
///
/// On success the operation's value is returned unmodified. Failures the
/// policy does not handle are returned as the original `E`, never wrapped.
/// Attempts within one call are strictly sequential.
pub trait Policy<R, E> {
    fn execute<F>(&self, operation: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>;
}

impl<R, E, P: Policy<R, E>> Policy<R, E> for &P {
    fn execute<F>(&self, operation: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        (**self).execute(operation)
    }
}

impl<R, E, P: Policy<R, E>> Policy<R, E> for Arc<P> {
    fn execute<F>(&self, operation: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        (**self).execute(operation)
    }
}
