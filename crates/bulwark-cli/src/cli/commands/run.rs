//! `bulwark run` – execute a simulated operation under a policy.

use anyhow::Result;
use bulwark_core::config::BulwarkConfig;
use bulwark_core::{AnyPolicy, ErrorClassifier, ErrorKind, OperationError, Policy, PolicyKind};
use serde::Serialize;

/// What to run: the policy kind and how the simulated operation misbehaves.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub policy: PolicyKind,
    /// Fail this many calls before succeeding; `None` fails every call.
    pub fail_first: Option<u32>,
    pub error_kind: ErrorKind,
    /// Kinds the policy handles; empty handles every failure.
    pub handle: Vec<ErrorKind>,
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub policy: String,
    pub succeeded: bool,
    pub response: Option<String>,
    pub error: Option<String>,
    pub invocations: u32,
}

/// Stand-in for a remote call: counts invocations and fails on schedule.
struct FlakyOperation {
    calls: u32,
    fail_first: Option<u32>,
    error_kind: ErrorKind,
}

impl FlakyOperation {
    fn call(&mut self) -> Result<String, OperationError> {
        self.calls += 1;
        tracing::debug!("simulated call {}", self.calls);
        match self.fail_first {
            Some(n) if self.calls > n => Ok("Ok".to_string()),
            _ => Err(OperationError::new(
                self.error_kind,
                format!("simulated failure on call {}", self.calls),
            )),
        }
    }
}

pub fn execute_scenario(cfg: &BulwarkConfig, scenario: &Scenario) -> Result<RunReport> {
    let classifier = if scenario.handle.is_empty() {
        ErrorClassifier::any()
    } else {
        ErrorClassifier::kinds(scenario.handle.iter().copied())
    };
    let policy = AnyPolicy::build(
        scenario.policy,
        cfg,
        classifier,
        cfg.fallback_message.clone(),
    )?;

    let mut op = FlakyOperation {
        calls: 0,
        fail_first: scenario.fail_first,
        error_kind: scenario.error_kind,
    };
    let result = policy.execute(|| op.call());

    let report = match result {
        Ok(response) => RunReport {
            policy: scenario.policy.to_string(),
            succeeded: true,
            response: Some(response),
            error: None,
            invocations: op.calls,
        },
        Err(e) => RunReport {
            policy: scenario.policy.to_string(),
            succeeded: false,
            response: None,
            error: Some(e.to_string()),
            invocations: op.calls,
        },
    };
    tracing::info!(
        "{} run finished after {} call(s), succeeded={}",
        report.policy,
        report.invocations,
        report.succeeded
    );
    Ok(report)
}

pub fn run_scenario(cfg: &BulwarkConfig, scenario: &Scenario, json: bool) -> Result<()> {
    let report = execute_scenario(cfg, scenario)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("policy:      {}", report.policy);
    println!("invocations: {}", report.invocations);
    match (&report.response, &report.error) {
        (Some(response), _) => println!("resp:        {}", response),
        (_, Some(error)) => println!("error:       {}", error),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::config::BackoffConfig;

    fn cfg() -> BulwarkConfig {
        BulwarkConfig {
            backoff: Some(BackoffConfig {
                base_delay_secs: 0.0,
                max_delay_secs: None,
            }),
            ..BulwarkConfig::default()
        }
    }

    fn scenario(policy: PolicyKind, fail_first: Option<u32>) -> Scenario {
        Scenario {
            policy,
            fail_first,
            error_kind: ErrorKind::Cancelled,
            handle: Vec::new(),
        }
    }

    #[test]
    fn no_policy_reports_first_failure() {
        let report = execute_scenario(&cfg(), &scenario(PolicyKind::NoPolicy, Some(1))).unwrap();
        assert!(!report.succeeded);
        assert_eq!(report.invocations, 1);
        assert_eq!(
            report.error.as_deref(),
            Some("cancelled: simulated failure on call 1")
        );
    }

    #[test]
    fn retry_recovers_from_single_failure() {
        let report = execute_scenario(&cfg(), &scenario(PolicyKind::Retry, Some(1))).unwrap();
        assert!(report.succeeded);
        assert_eq!(report.response.as_deref(), Some("Ok"));
        assert_eq!(report.invocations, 2);
    }

    #[test]
    fn retry_exhausts_budget_when_every_call_fails() {
        let report = execute_scenario(&cfg(), &scenario(PolicyKind::Retry, None)).unwrap();
        assert!(!report.succeeded);
        assert_eq!(report.invocations, 4);
        assert_eq!(
            report.error.as_deref(),
            Some("cancelled: simulated failure on call 4")
        );
    }

    #[test]
    fn wrap_falls_back_after_full_budget() {
        let report = execute_scenario(&cfg(), &scenario(PolicyKind::Wrap, None)).unwrap();
        assert!(report.succeeded);
        assert_eq!(
            report.response.as_deref(),
            Some("Try again later (message from fallback policy)")
        );
        assert_eq!(report.invocations, 4);
    }

    #[test]
    fn unhandled_kind_is_not_retried() {
        let mut s = scenario(PolicyKind::WaitAndRetry, None);
        s.handle = vec![ErrorKind::Timeout];
        let report = execute_scenario(&cfg(), &s).unwrap();
        assert!(!report.succeeded);
        assert_eq!(report.invocations, 1);
    }

    #[test]
    fn report_serializes_to_json() {
        let report = execute_scenario(&cfg(), &scenario(PolicyKind::Fallback, None)).unwrap();
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["policy"], "fallback");
        assert_eq!(json["succeeded"], true);
        assert_eq!(json["invocations"], 1);
        assert!(json["error"].is_null());
    }
}
