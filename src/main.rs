//! netwake: network change monitor
//!
//! Entry point for the netwake command-line tool.

use std::process::ExitCode;

mod app;
mod cli;
mod run;

use app::{exit_code, setup_tracing};
use cli::Cli;
use run::{RunError, RuntimeOptions};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    run_application(RuntimeOptions { count: cli.count })
}

/// Runs the main application with the given options.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(options: RuntimeOptions) -> ExitCode {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    match runtime.block_on(run::execute(options)) {
        Ok(()) => exit_code::SUCCESS,
        Err(error @ RunError::Start(_)) => {
            tracing::error!("Application error: {error}");
            exit_code::START_ERROR
        }
        Err(error) => {
            tracing::error!("Application error: {error}");
            exit_code::runtime_error()
        }
    }
}
