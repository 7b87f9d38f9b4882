//! County health pipeline CLI.

use clap::Parser;
use tracing::error;

use county_cli::cli::{Cli, Command};
use county_cli::logging::init_logging;
use county_core::PipelineError;

mod commands;
mod summary;

use crate::commands::{check, run, tables};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config();
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Run(args) => match run(&args) {
            Ok(report) => {
                print_summary(&report);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Check(args) => match check(&args) {
            Ok(true) => 0,
            Ok(false) => 1,
            Err(error) => report_error(&error),
        },
        Command::Tables(args) => match tables(&args) {
            Ok(()) => 0,
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) -> i32 {
    let kind = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<PipelineError>())
        .map(PipelineError::kind);
    match kind {
        Some(kind) => {
            error!(kind = %kind, "pipeline failed");
            eprintln!("error ({kind}): {error:#}");
        }
        None => eprintln!("error: {error:#}"),
    }
    1
}
