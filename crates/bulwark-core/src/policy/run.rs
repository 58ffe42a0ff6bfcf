//! Retry loop shared by the retry and wait-and-retry policies.

use super::classify::ErrorClassifier;
use super::context::AttemptContext;
use std::fmt;
use std::time::Duration;

/// Runs `operation` until it succeeds, fails with an error the classifier
/// rejects, or `max_retries` retries have been spent.
///
/// Before each retry `before_retry(error, retry_number)` is called with the
/// 1-based retry number; it notifies handlers, waits if needed, and returns
/// the delay it waited. The last error is returned unchanged on exhaustion.
pub(crate) fn run_with_retry<R, E, F, B>(
    classifier: &ErrorClassifier<E>,
    max_retries: u32,
    mut operation: F,
    mut before_retry: B,
) -> Result<R, E>
where
    E: fmt::Display,
    F: FnMut() -> Result<R, E>,
    B: FnMut(&E, u32) -> Duration,
{
    let mut ctx = AttemptContext::new();
    loop {
        match operation() {
            Ok(value) => {
                if let Some(last) = ctx.last_error() {
                    tracing::debug!(
                        "recovered after {} retries (waited {:?}); last error: {}",
                        ctx.retries(),
                        ctx.elapsed_delay(),
                        last
                    );
                }
                return Ok(value);
            }
            Err(e) => {
                if !classifier.handles(&e) {
                    tracing::debug!("error not handled by policy, propagating: {}", e);
                    return Err(e);
                }
                if ctx.retries() >= max_retries {
                    if max_retries > 0 {
                        tracing::warn!(
                            "giving up after {} retries (waited {:?}): {}",
                            ctx.retries(),
                            ctx.elapsed_delay(),
                            e
                        );
                    }
                    return Err(e);
                }
                let retry = ctx.retries() + 1;
                let waited = before_retry(&e, retry);
                ctx.record_retry(e, waited);
            }
        }
    }
}
