//! Fallback policy: turn a handled failure into a substitute result.

use super::classify::ErrorClassifier;
use super::{Policy, Wrap};
use std::fmt;
use std::sync::Arc;

/// Produces the substitute result from the failure that reached this layer.
pub type FallbackProducer<R, E> = Arc<dyn Fn(&E) -> R + Send + Sync>;

/// Called with the handled failure before the fallback value is produced.
pub type FallbackHandler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Runs the operation once. A handled failure is absorbed and replaced by the
/// producer's value; unhandled failures propagate unchanged.
pub struct FallbackPolicy<R, E> {
    classifier: ErrorClassifier<E>,
    producer: FallbackProducer<R, E>,
    on_fallback: Option<FallbackHandler<E>>,
}

impl<R, E> Clone for FallbackPolicy<R, E> {
    fn clone(&self) -> Self {
        Self {
            classifier: self.classifier.clone(),
            producer: Arc::clone(&self.producer),
            on_fallback: self.on_fallback.clone(),
        }
    }
}

impl<R, E> fmt::Debug for FallbackPolicy<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackPolicy")
            .field("on_fallback", &self.on_fallback.as_ref().map(|_| "<handler>"))
            .finish_non_exhaustive()
    }
}

impl<R: 'static, E: 'static> FallbackPolicy<R, E> {
    /// Compute the substitute from the failure.
    pub fn new<P>(classifier: ErrorClassifier<E>, producer: P) -> Self
    where
        P: Fn(&E) -> R + Send + Sync + 'static,
    {
        Self {
            classifier,
            producer: Arc::new(producer),
            on_fallback: None,
        }
    }

    /// Substitute a precomputed value.
    pub fn value(classifier: ErrorClassifier<E>, value: R) -> Self
    where
        R: Clone + Send + Sync,
    {
        Self::new(classifier, move |_| value.clone())
    }

    /// Observe the failure before it is replaced.
    pub fn on_fallback<H>(mut self, handler: H) -> Self
    where
        H: Fn(&E) + Send + Sync + 'static,
    {
        self.on_fallback = Some(Arc::new(handler));
        self
    }
}

impl<R, E> FallbackPolicy<R, E> {
    pub fn wrap<I>(self, inner: I) -> Wrap<Self, I> {
        Wrap::new(self, inner)
    }
}

impl<R, E: fmt::Display> Policy<R, E> for FallbackPolicy<R, E> {
    fn execute<F>(&self, mut operation: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        match operation() {
            Ok(value) => Ok(value),
            Err(e) if self.classifier.handles(&e) => {
                tracing::info!("falling back after error: {}", e);
                if let Some(handler) = &self.on_fallback {
                    handler(&e);
                }
                Ok((self.producer)(&e))
            }
            Err(e) => {
                tracing::debug!("error not handled by fallback, propagating: {}", e);
                Err(e)
            }
        }
    }
}
