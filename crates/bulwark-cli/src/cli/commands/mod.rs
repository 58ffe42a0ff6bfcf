//! CLI command handlers.

mod kinds;
mod run;

pub use kinds::run_kinds;
pub use run::{run_scenario, Scenario};
