//! Policy selection by kind, resolved once at construction time.

use super::backoff::Backoff;
use super::classify::ErrorClassifier;
use super::{FallbackPolicy, NoPolicy, Policy, RetryPolicy, WaitAndRetryPolicy, Wrap};
use crate::config::BulwarkConfig;
use crate::error::ParsePolicyKindError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The policy strategies available, numbered as they are listed to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    NoPolicy = 1,
    Retry = 2,
    WaitAndRetry = 3,
    Fallback = 4,
    /// Fallback wrapped around wait-and-retry.
    Wrap = 5,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::NoPolicy,
        PolicyKind::Retry,
        PolicyKind::WaitAndRetry,
        PolicyKind::Fallback,
        PolicyKind::Wrap,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.number() == n)
    }

    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::NoPolicy => "no-policy",
            PolicyKind::Retry => "retry",
            PolicyKind::WaitAndRetry => "wait-and-retry",
            PolicyKind::Fallback => "fallback",
            PolicyKind::Wrap => "wrap",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PolicyKind::NoPolicy => "run once, no failure handling",
            PolicyKind::Retry => "retry immediately up to max_retries times",
            PolicyKind::WaitAndRetry => "retry with exponential backoff between attempts",
            PolicyKind::Fallback => "replace a failure with the fallback message",
            PolicyKind::Wrap => "fallback wrapped around wait-and-retry",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PolicyKind {
    type Err = ParsePolicyKindError;

    /// Accepts the list number (`1`..`5`) or the name in any case, with or
    /// without separators (`wait-and-retry`, `WaitAndRetry`, `wait_and_retry`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u8>() {
            return Self::from_number(n).ok_or_else(|| ParsePolicyKindError(s.to_string()));
        }
        let squashed: String = trimmed
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|k| k.name().replace('-', "") == squashed)
            .ok_or_else(|| ParsePolicyKindError(s.to_string()))
    }
}

/// One policy of any kind, chosen at construction time.
#[derive(Debug, Clone)]
pub enum AnyPolicy<R, E> {
    NoPolicy(NoPolicy),
    Retry(RetryPolicy<E>),
    WaitAndRetry(WaitAndRetryPolicy<E>),
    Fallback(FallbackPolicy<R, E>),
    Wrap(Wrap<FallbackPolicy<R, E>, WaitAndRetryPolicy<E>>),
}

impl<R, E> AnyPolicy<R, E>
where
    R: Clone + Send + Sync + 'static,
    E: fmt::Display + 'static,
{
    /// Build the policy for `kind` from configuration. Handlers log each
    /// handled failure; the fallback layers substitute `fallback`.
    pub fn build(
        kind: PolicyKind,
        cfg: &BulwarkConfig,
        classifier: ErrorClassifier<E>,
        fallback: R,
    ) -> Result<Self> {
        let policy = match kind {
            PolicyKind::NoPolicy => AnyPolicy::NoPolicy(NoPolicy),
            PolicyKind::Retry => AnyPolicy::Retry(retry_policy(cfg, classifier)),
            PolicyKind::WaitAndRetry => {
                AnyPolicy::WaitAndRetry(wait_and_retry_policy(cfg, classifier, "wait-and-retry")?)
            }
            PolicyKind::Fallback => {
                AnyPolicy::Fallback(fallback_policy(classifier, fallback, "fallback"))
            }
            PolicyKind::Wrap => {
                let inner = wait_and_retry_policy(cfg, classifier.clone(), "wrap/wait-and-retry")?;
                AnyPolicy::Wrap(fallback_policy(classifier, fallback, "wrap/fallback").wrap(inner))
            }
        };
        tracing::debug!("built {} policy (max_retries={})", kind, cfg.max_retries);
        Ok(policy)
    }
}

impl<R, E> AnyPolicy<R, E> {
    pub fn kind(&self) -> PolicyKind {
        match self {
            AnyPolicy::NoPolicy(_) => PolicyKind::NoPolicy,
            AnyPolicy::Retry(_) => PolicyKind::Retry,
            AnyPolicy::WaitAndRetry(_) => PolicyKind::WaitAndRetry,
            AnyPolicy::Fallback(_) => PolicyKind::Fallback,
            AnyPolicy::Wrap(_) => PolicyKind::Wrap,
        }
    }
}

impl<R, E: fmt::Display> Policy<R, E> for AnyPolicy<R, E> {
    fn execute<F>(&self, operation: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        match self {
            AnyPolicy::NoPolicy(p) => p.execute(operation),
            AnyPolicy::Retry(p) => p.execute(operation),
            AnyPolicy::WaitAndRetry(p) => p.execute(operation),
            AnyPolicy::Fallback(p) => p.execute(operation),
            AnyPolicy::Wrap(p) => p.execute(operation),
        }
    }
}

fn retry_policy<E>(cfg: &BulwarkConfig, classifier: ErrorClassifier<E>) -> RetryPolicy<E>
where
    E: fmt::Display + 'static,
{
    RetryPolicy::new(cfg.max_retries, classifier).on_retry(|e: &E, attempt| {
        tracing::info!("retry handler caught error on attempt {}: {}", attempt, e);
    })
}

fn wait_and_retry_policy<E>(
    cfg: &BulwarkConfig,
    classifier: ErrorClassifier<E>,
    label: &'static str,
) -> Result<WaitAndRetryPolicy<E>>
where
    E: fmt::Display + 'static,
{
    let backoff: Backoff = cfg.backoff_config().to_backoff()?;
    Ok(
        WaitAndRetryPolicy::new(cfg.max_retries, classifier, backoff).on_retry(
            move |e: &E, delay, attempt| {
                tracing::info!(
                    "{} handler caught error on attempt {}, waiting {:?}: {}",
                    label,
                    attempt,
                    delay,
                    e
                );
            },
        ),
    )
}

fn fallback_policy<R, E>(
    classifier: ErrorClassifier<E>,
    fallback: R,
    label: &'static str,
) -> FallbackPolicy<R, E>
where
    R: Clone + Send + Sync + 'static,
    E: fmt::Display + 'static,
{
    FallbackPolicy::value(classifier, fallback).on_fallback(move |e: &E| {
        tracing::info!("{} handler caught error: {}", label, e);
    })
}
