//! Argument parsing and logging precedence.

use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use county_cli::cli::{Cli, Command, JoinArg};
use county_cli::logging::LogFormat;
use county_model::JoinMode;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("county-health").chain(args.iter().copied())).unwrap()
}

#[test]
fn run_flags_parse() {
    let cli = parse(&[
        "run",
        "--config",
        "pipeline.toml",
        "--data-dir",
        "raw",
        "--join",
        "left",
        "--strict-geography",
        "--dry-run",
        "--no-manifest",
    ]);
    let Command::Run(args) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(args.config, Some(PathBuf::from("pipeline.toml")));
    assert_eq!(args.data_dir, Some(PathBuf::from("raw")));
    assert_eq!(args.join, Some(JoinArg::Left));
    assert_eq!(JoinMode::from(JoinArg::Left), JoinMode::Left);
    assert!(args.strict_geography);
    assert!(args.dry_run);
    assert!(args.no_manifest);
    assert!(args.output.is_none());
}

#[test]
fn unknown_join_mode_is_rejected() {
    let result = Cli::try_parse_from(["county-health", "run", "--join", "outer"]);
    assert!(result.is_err());
}

#[test]
fn default_logging_defers_to_environment() {
    let cli = parse(&["check"]);
    let config = cli.log_config();
    assert_eq!(config.level_filter, LevelFilter::WARN);
    assert!(config.use_env_filter);
    assert_eq!(config.format, LogFormat::Pretty);
    assert!(!config.with_timestamps);
}

#[test]
fn explicit_level_wins_over_verbosity() {
    let cli = parse(&["-v", "--log-level", "debug", "--log-format", "json", "tables"]);
    let config = cli.log_config();
    assert_eq!(config.level_filter, LevelFilter::DEBUG);
    assert!(!config.use_env_filter);
    assert_eq!(config.format, LogFormat::Json);

    let cli = parse(&["-v", "tables", "--json"]);
    let config = cli.log_config();
    assert_eq!(config.level_filter, LevelFilter::INFO);
    assert!(!config.use_env_filter);
    let Command::Tables(args) = cli.command else {
        panic!("expected tables command");
    };
    assert!(args.json);
}

#[test]
fn log_file_gets_timestamps_without_ansi() {
    let cli = parse(&["--log-file", "run.log", "check", "--data-dir", "raw"]);
    let config = cli.log_config();
    assert_eq!(config.log_file, Some(PathBuf::from("run.log")));
    assert!(!config.with_ansi);
    assert!(config.with_timestamps);
}
