//! Shared helpers for policy integration tests.

#![allow(dead_code)]

use bulwark_core::{ErrorKind, OperationError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Operation that fails with `kind` on its first `fail_first` calls (or on
/// every call when `fail_first` is `None`) and then returns `"Ok"`.
pub struct Flaky {
    calls: AtomicU32,
    fail_first: Option<u32>,
    kind: ErrorKind,
}

impl Flaky {
    pub fn always(kind: ErrorKind) -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_first: None,
            kind,
        }
    }

    pub fn failing_first(n: u32, kind: ErrorKind) -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_first: Some(n),
            kind,
        }
    }

    pub fn call(&self) -> Result<&'static str, OperationError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.fail_first {
            Some(limit) if n > limit => Ok("Ok"),
            _ => Err(OperationError::new(self.kind, format!("call {} failed", n))),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Sleeper that records requested delays instead of blocking.
pub fn recording_sleeper() -> (Arc<Mutex<Vec<Duration>>>, impl Fn(Duration) + Send + Sync + 'static)
{
    let slept = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&slept);
    (slept, move |d| sink.lock().unwrap().push(d))
}
