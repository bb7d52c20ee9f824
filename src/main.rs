//! tplsync: keep generated files in sync with their templates.
//!
//! This is the main entry point for the `tplsync` CLI. It parses arguments,
//! runs check or write mode, and maps the outcome to an exit code.

mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod env_block;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod generate;
mod logging;
pub mod template;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match commands::dispatch(cli) {
        Ok(outcome) => ExitCode::from(outcome.exit_code() as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
