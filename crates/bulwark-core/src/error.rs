//! Error types shared by the policy core and its callers.

use crate::policy::{ErrorKind, Tagged};
use thiserror::Error;

/// A failure reported by a protected operation, tagged with its [`ErrorKind`]
/// so classifiers can decide on the tag instead of on the concrete type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct OperationError {
    pub kind: ErrorKind,
    pub message: String,
}

impl OperationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The operation was cancelled before it could complete.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "the operation was canceled")
    }
}

impl Tagged for OperationError {
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Returned when an error kind name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error kind '{0}' (expected timeout, connection, throttled, http-5xx, ...)")]
pub struct ParseErrorKindError(pub String);

/// Returned when a policy kind cannot be parsed from a number or a name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown policy kind '{0}' (expected 1-5 or a policy name)")]
pub struct ParsePolicyKindError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let e = OperationError::new(ErrorKind::Timeout, "read timed out");
        assert_eq!(e.to_string(), "timeout: read timed out");
        let e = OperationError::new(ErrorKind::Http5xx(503), "unavailable");
        assert_eq!(e.to_string(), "http-503: unavailable");
    }

    #[test]
    fn cancelled_is_tagged() {
        assert_eq!(OperationError::cancelled().kind(), ErrorKind::Cancelled);
    }
}
