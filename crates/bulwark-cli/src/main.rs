use bulwark_core::logging::{self, Verbosity};
use clap::Parser;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Policy events go to the state log; stderr if the state dir is unusable.
    let verbosity = Verbosity::from_flag(cli.verbose);
    if let Err(err) = logging::init_logging(verbosity) {
        logging::init_logging_stderr(verbosity);
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    if let Err(err) = cli.command.run() {
        eprintln!("bulwark error: {:#}", err);
        std::process::exit(1);
    }
}
