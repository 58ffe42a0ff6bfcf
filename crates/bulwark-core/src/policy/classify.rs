//! Error kinds and the classifier that decides which failures a policy acts on.

use crate::error::ParseErrorKindError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// High-level classification of an error for policy decisions.
///
/// This intentionally stays generic; callers map their own failures
/// (HTTP status codes, IO errors, cancellations) into these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Remote asked us to slow down (e.g. 429).
    Throttled,
    /// Server-side HTTP failure (5xx).
    Http5xx(u16),
    /// The operation was cancelled.
    Cancelled,
    /// Anything else.
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Connection => write!(f, "connection"),
            ErrorKind::Throttled => write!(f, "throttled"),
            ErrorKind::Http5xx(code) => write!(f, "http-{}", code),
            ErrorKind::Cancelled => write!(f, "cancelled"),
            ErrorKind::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ErrorKind {
    type Err = ParseErrorKindError;

    /// Accepts the `Display` names; `http-5xx` is shorthand for `http-500`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let kind = match lower.as_str() {
            "timeout" => ErrorKind::Timeout,
            "connection" => ErrorKind::Connection,
            "throttled" => ErrorKind::Throttled,
            "cancelled" | "canceled" => ErrorKind::Cancelled,
            "other" => ErrorKind::Other,
            "http-5xx" => ErrorKind::Http5xx(500),
            _ => match lower.strip_prefix("http-").and_then(|c| c.parse::<u16>().ok()) {
                Some(code @ 500..=599) => ErrorKind::Http5xx(code),
                _ => return Err(ParseErrorKindError(s.to_string())),
            },
        };
        Ok(kind)
    }
}

/// Errors that carry an explicit [`ErrorKind`] tag.
pub trait Tagged {
    fn kind(&self) -> ErrorKind;
}

/// Predicate deciding whether a failure is one a policy may handle.
///
/// Built once per policy and never changed afterwards. Failures it rejects
/// propagate unchanged through that policy layer.
pub struct ErrorClassifier<E> {
    predicate: Arc<dyn Fn(&E) -> bool + Send + Sync>,
}

impl<E> Clone for ErrorClassifier<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<E> fmt::Debug for ErrorClassifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorClassifier").finish_non_exhaustive()
    }
}

impl<E: 'static> ErrorClassifier<E> {
    pub fn new<P>(predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Handle every failure.
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    /// Handle failures accepted by either classifier.
    pub fn or(self, other: ErrorClassifier<E>) -> Self {
        Self::new(move |e| self.handles(e) || other.handles(e))
    }
}

impl<E> ErrorClassifier<E> {
    pub fn handles(&self, error: &E) -> bool {
        (self.predicate)(error)
    }
}

impl<E: Tagged + 'static> ErrorClassifier<E> {
    /// Handle failures whose tag is one of `kinds`.
    pub fn kinds(kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        let kinds: Vec<ErrorKind> = kinds.into_iter().collect();
        Self::new(move |e: &E| kinds.contains(&e.kind()))
    }

    /// Handle transient failures: timeouts, connection errors, throttling and 5xx.
    pub fn transient() -> Self {
        Self::new(|e: &E| {
            matches!(
                e.kind(),
                ErrorKind::Timeout
                    | ErrorKind::Connection
                    | ErrorKind::Throttled
                    | ErrorKind::Http5xx(_)
            )
        })
    }
}

impl<E: 'static> Default for ErrorClassifier<E> {
    fn default() -> Self {
        Self::any()
    }
}
