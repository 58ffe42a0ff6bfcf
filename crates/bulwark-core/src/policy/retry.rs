//! Immediate retry policy.

use super::classify::ErrorClassifier;
use super::run::run_with_retry;
use super::{Policy, Wrap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Called before each retry with the handled error and the 1-based retry number.
pub type RetryHandler<E> = Arc<dyn Fn(&E, u32) + Send + Sync>;

/// Re-invokes the operation on handled failures, with no delay, up to
/// `max_retries` times after the first attempt (so at most `max_retries + 1`
/// invocations).
pub struct RetryPolicy<E> {
    max_retries: u32,
    classifier: ErrorClassifier<E>,
    on_retry: Option<RetryHandler<E>>,
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            classifier: self.classifier.clone(),
            on_retry: self.on_retry.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("on_retry", &self.on_retry.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

impl<E: 'static> RetryPolicy<E> {
    pub fn new(max_retries: u32, classifier: ErrorClassifier<E>) -> Self {
        Self {
            max_retries,
            classifier,
            on_retry: None,
        }
    }

    /// Observe each handled failure before it is retried.
    pub fn on_retry<H>(mut self, handler: H) -> Self
    where
        H: Fn(&E, u32) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(handler));
        self
    }
}

impl<E> RetryPolicy<E> {
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn wrap<I>(self, inner: I) -> Wrap<Self, I> {
        Wrap::new(self, inner)
    }
}

impl<R, E: fmt::Display> Policy<R, E> for RetryPolicy<E> {
    fn execute<F>(&self, operation: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        run_with_retry(&self.classifier, self.max_retries, operation, |e, retry| {
            tracing::debug!("retry {}/{} after error: {}", retry, self.max_retries, e);
            if let Some(handler) = &self.on_retry {
                handler(e, retry);
            }
            Duration::ZERO
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OperationError;
    use crate::policy::ErrorKind;
    use std::sync::Mutex;

    fn timeout() -> OperationError {
        OperationError::new(ErrorKind::Timeout, "timed out")
    }

    #[test]
    fn always_failing_runs_budget_plus_one() {
        for budget in 1..=5 {
            let policy = RetryPolicy::new(budget, ErrorClassifier::any());
            let mut calls = 0;
            let res: Result<(), OperationError> = policy.execute(|| {
                calls += 1;
                Err(OperationError::new(ErrorKind::Timeout, format!("call {}", calls)))
            });
            assert_eq!(calls, budget + 1);
            // The last error is propagated, not the first.
            assert_eq!(res.unwrap_err().message, format!("call {}", budget + 1));
        }
    }

    #[test]
    fn succeeds_on_kth_call_without_extra_calls() {
        let budget = 3;
        for k in 1..=budget + 1 {
            let policy = RetryPolicy::new(budget, ErrorClassifier::any());
            let mut calls = 0;
            let res = policy.execute(|| {
                calls += 1;
                if calls < k {
                    Err(timeout())
                } else {
                    Ok(calls)
                }
            });
            assert_eq!(res, Ok(k));
            assert_eq!(calls, k);
        }
    }

    #[test]
    fn handler_sees_each_retry_number() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let policy = RetryPolicy::new(3, ErrorClassifier::any())
            .on_retry(move |e: &OperationError, n| sink.lock().unwrap().push((e.kind, n)));
        let _: Result<(), _> = policy.execute(|| Err(timeout()));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (ErrorKind::Timeout, 1),
                (ErrorKind::Timeout, 2),
                (ErrorKind::Timeout, 3)
            ]
        );
    }

    #[test]
    fn unhandled_error_is_not_retried() {
        let handled = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&handled);
        let policy = RetryPolicy::new(3, ErrorClassifier::kinds([ErrorKind::Timeout]))
            .on_retry(move |_: &OperationError, _| *sink.lock().unwrap() += 1);
        let mut calls = 0;
        let res: Result<(), _> = policy.execute(|| {
            calls += 1;
            Err(OperationError::cancelled())
        });
        assert_eq!(res, Err(OperationError::cancelled()));
        assert_eq!(calls, 1);
        assert_eq!(*handled.lock().unwrap(), 0);
    }

    #[test]
    fn zero_budget_behaves_like_no_policy() {
        let handled = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&handled);
        let policy = RetryPolicy::new(0, ErrorClassifier::any())
            .on_retry(move |_: &OperationError, _| *sink.lock().unwrap() += 1);
        let mut calls = 0;
        let res: Result<(), _> = policy.execute(|| {
            calls += 1;
            Err(timeout())
        });
        assert_eq!(res, Err(timeout()));
        assert_eq!(calls, 1);
        assert_eq!(*handled.lock().unwrap(), 0);
    }

    #[test]
    fn policy_is_reusable() {
        let policy = RetryPolicy::new(2, ErrorClassifier::any());
        for _ in 0..3 {
            let mut calls = 0;
            let _: Result<(), OperationError> = policy.execute(|| {
                calls += 1;
                Err(timeout())
            });
            assert_eq!(calls, 3);
        }
    }
}
