//! Logging init for policy events.
//!
//! Retry, wait and fallback decisions are logged under the `bulwark_core::policy`
//! target. By default they go to `~/.local/state/bulwark/bulwark.log`; callers
//! fall back to stderr when the state dir is unusable. `RUST_LOG` overrides
//! the verbosity chosen here.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const POLICY_TARGET: &str = "bulwark_core::policy";

/// How much of the policy machinery to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Fallbacks, exhausted budgets and handler output.
    #[default]
    Normal,
    /// Also every retry, computed delay and unhandled error.
    Verbose,
}

impl Verbosity {
    pub fn from_flag(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// `EnvFilter` directives for this verbosity.
    pub fn directives(self) -> String {
        let policy_level = match self {
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
        };
        format!("warn,bulwark={},{}={}", policy_level, POLICY_TARGET, policy_level)
    }

    fn env_filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directives()))
    }
}

/// Writer that is either the log file or stderr (used when the file handle cannot be cloned).
enum FileOrStderr {
    File(fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct PolicyLogFile(fs::File);

impl<'a> MakeWriter<'a> for PolicyLogFile {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

/// `~/.local/state/bulwark/bulwark.log`, creating the directory if needed.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bulwark")?;
    let path = xdg_dirs
        .place_state_file("bulwark.log")
        .context("create bulwark state dir")?;
    Ok(path)
}

/// Log policy events to the XDG state log file and return its path.
/// On failure returns Err so the caller can fall back to [`init_logging_stderr`].
pub fn init_logging(verbosity: Verbosity) -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(verbosity.env_filter())
        .with_writer(BoxMakeWriter::new(PolicyLogFile(file)))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {}", e))?;

    tracing::debug!("policy log at {} ({:?})", path.display(), verbosity);
    Ok(path)
}

/// Log policy events to stderr only.
pub fn init_logging_stderr(verbosity: Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(verbosity.env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
