//! CLI parse tests.

use super::{Cli, CliCommand};
use bulwark_core::{ErrorKind, PolicyKind};
use clap::Parser;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_kinds() {
    match parse(&["bulwark", "kinds"]) {
        CliCommand::Kinds => {}
        _ => panic!("expected Kinds"),
    }
}

#[test]
fn cli_parse_run_defaults() {
    match parse(&["bulwark", "run", "wrap"]) {
        CliCommand::Run {
            policy,
            fail_first,
            error_kind,
            handle,
            max_retries,
            config,
            json,
        } => {
            assert_eq!(policy, PolicyKind::Wrap);
            assert!(fail_first.is_none());
            assert_eq!(error_kind, ErrorKind::Cancelled);
            assert!(handle.is_empty());
            assert!(max_retries.is_none());
            assert!(config.is_none());
            assert!(!json);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_by_number_with_options() {
    match parse(&[
        "bulwark",
        "run",
        "3",
        "--fail-first",
        "2",
        "--error-kind",
        "http-503",
        "--handle",
        "http-503",
        "--handle",
        "timeout",
        "--max-retries",
        "5",
        "--json",
    ]) {
        CliCommand::Run {
            policy,
            fail_first,
            error_kind,
            handle,
            max_retries,
            json,
            ..
        } => {
            assert_eq!(policy, PolicyKind::WaitAndRetry);
            assert_eq!(fail_first, Some(2));
            assert_eq!(error_kind, ErrorKind::Http5xx(503));
            assert_eq!(handle, vec![ErrorKind::Http5xx(503), ErrorKind::Timeout]);
            assert_eq!(max_retries, Some(5));
            assert!(json);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_config_path() {
    match parse(&["bulwark", "run", "retry", "--config", "/tmp/bulwark.toml"]) {
        CliCommand::Run { config, .. } => {
            assert_eq!(config.as_deref(), Some(std::path::Path::new("/tmp/bulwark.toml")))
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_rejects_unknown_policy() {
    assert!(Cli::try_parse_from(["bulwark", "run", "circuit-breaker"]).is_err());
    assert!(Cli::try_parse_from(["bulwark", "run", "9"]).is_err());
}

#[test]
fn cli_parse_verbose_anywhere() {
    let cli = Cli::try_parse_from(["bulwark", "-v", "kinds"]).unwrap();
    assert!(cli.verbose);
    let cli = Cli::try_parse_from(["bulwark", "run", "retry", "--verbose"]).unwrap();
    assert!(cli.verbose);
    let cli = Cli::try_parse_from(["bulwark", "kinds"]).unwrap();
    assert!(!cli.verbose);
}
