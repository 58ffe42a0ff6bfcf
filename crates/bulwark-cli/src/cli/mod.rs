//! CLI for the bulwark scenario runner.

mod commands;

use anyhow::Result;
use bulwark_core::config;
use bulwark_core::{ErrorKind, PolicyKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_kinds, run_scenario, Scenario};

/// Top-level CLI for bulwark.
#[derive(Debug, Parser)]
#[command(name = "bulwark")]
#[command(about = "bulwark: run a simulated flaky operation under a policy", long_about = None)]
pub struct Cli {
    /// Log every retry and computed delay, not just fallbacks and exhausted budgets.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List the available policy kinds.
    Kinds,

    /// Execute a simulated operation under a policy and report the outcome.
    Run {
        /// Policy kind: number (1-5) or name (no-policy, retry, wait-and-retry, fallback, wrap).
        policy: PolicyKind,

        /// Fail the first N calls, then succeed. Without it every call fails.
        #[arg(long, value_name = "N")]
        fail_first: Option<u32>,

        /// Kind of the simulated failure (timeout, connection, throttled, http-503, other, ...).
        #[arg(long, default_value = "cancelled", value_name = "KIND")]
        error_kind: ErrorKind,

        /// Only handle failures of these kinds (default: handle every failure).
        #[arg(long = "handle", value_name = "KIND")]
        handle: Vec<ErrorKind>,

        /// Override max_retries from the config file.
        #[arg(long, value_name = "N")]
        max_retries: Option<u32>,

        /// Read configuration from this file instead of the XDG config path.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl CliCommand {
    pub fn run(self) -> Result<()> {
        match self {
            CliCommand::Kinds => run_kinds(),
            CliCommand::Run {
                policy,
                fail_first,
                error_kind,
                handle,
                max_retries,
                config: config_path,
                json,
            } => {
                let mut cfg = match config_path {
                    Some(path) => config::load_from_path(&path)?,
                    None => config::load_or_init()?,
                };
                tracing::debug!("loaded config: {:?}", cfg);
                if let Some(n) = max_retries {
                    cfg.max_retries = n;
                }
                let scenario = Scenario {
                    policy,
                    fail_first,
                    error_kind,
                    handle,
                };
                run_scenario(&cfg, &scenario, json)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
