pub mod config;
pub mod error;
pub mod logging;
pub mod policy;

pub use error::OperationError;
pub use policy::{
    AnyPolicy, Backoff, ErrorClassifier, ErrorKind, FallbackPolicy, NoPolicy, Policy, PolicyKind,
    RetryPolicy, Tagged, WaitAndRetryPolicy, Wrap,
};
