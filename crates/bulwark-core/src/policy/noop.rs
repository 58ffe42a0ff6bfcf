//! Identity policy.

use super::{Policy, Wrap};

/// Runs the operation exactly once; any failure propagates as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPolicy;

impl NoPolicy {
    pub fn wrap<I>(self, inner: I) -> Wrap<Self, I> {
        Wrap::new(self, inner)
    }
}

impl<R, E> Policy<R, E> for NoPolicy {
    fn execute<F>(&self, mut operation: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        operation()
    }
}
