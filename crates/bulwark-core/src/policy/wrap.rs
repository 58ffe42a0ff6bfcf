//! Composition of two policies.

use super::Policy;

/// Runs `inner` as the operation of `outer`:
/// `Wrap(outer, inner).execute(op) == outer.execute(|| inner.execute(op))`.
///
/// The whole inner execution, retries and waits included, is one attempt from
/// the outer policy's point of view. Order matters: a fallback around a retry
/// only falls back once the retries are spent, while a retry around a fallback
/// never sees a failure to retry. Longer chains nest `Wrap` values.
#[derive(Debug, Clone)]
pub struct Wrap<O, I> {
    outer: O,
    inner: I,
}

impl<O, I> Wrap<O, I> {
    pub fn new(outer: O, inner: I) -> Self {
        Self { outer, inner }
    }

    pub fn outer(&self) -> &O {
        &self.outer
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }

    /// Wrap this pair around a further inner policy.
    pub fn wrap<N>(self, inner: N) -> Wrap<Self, N> {
        Wrap::new(self, inner)
    }
}

impl<R, E, O, I> Policy<R, E> for Wrap<O, I>
where
    O: Policy<R, E>,
    I: Policy<R, E>,
{
    fn execute<F>(&self, mut operation: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        self.outer.execute(|| self.inner.execute(&mut operation))
    }
}
