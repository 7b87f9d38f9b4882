//! CLI argument definitions for the county health pipeline.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use county_model::JoinMode;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "county-health",
    version,
    about = "County health ETL - join SAMHSA substate estimates with ACS county tables",
    long_about = "Join SAMHSA substate mental health estimates with ACS county subject tables.\n\n\
                  Reads raw CSV extracts from a data directory, bridges substate regions\n\
                  to counties and writes one analytic CSV with a run manifest."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write timestamped logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline and write the county table.
    Run(RunArgs),

    /// Verify that every configured input exists and carries its columns.
    Check(CheckArgs),

    /// List configured tables and their column maps.
    Tables(TablesArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Pipeline configuration (.toml or .json); the built-in one when omitted.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Raw data directory (overrides COUNTY_HEALTH_DATA_DIR and the config).
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output CSV path (overrides the config).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Join semantics for every join step.
    #[arg(long = "join", value_enum)]
    pub join: Option<JoinArg>,

    /// Abort on SAMHSA state names without a FIPS code instead of dropping them.
    #[arg(long = "strict-geography")]
    pub strict_geography: bool,

    /// Build the table and report without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Skip writing the run manifest next to the output.
    #[arg(long = "no-manifest")]
    pub no_manifest: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Pipeline configuration (.toml or .json); the built-in one when omitted.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Raw data directory (overrides COUNTY_HEALTH_DATA_DIR and the config).
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct TablesArgs {
    /// Pipeline configuration (.toml or .json); the built-in one when omitted.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI join mode choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum JoinArg {
    Inner,
    Left,
}

impl From<JoinArg> for JoinMode {
    fn from(arg: JoinArg) -> Self {
        match arg {
            JoinArg::Inner => JoinMode::Inner,
            JoinArg::Left => JoinMode::Left,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl Cli {
    /// Logging configuration from the global flags.
    ///
    /// `--log-level` wins over `-v`/`-q`; with neither, `RUST_LOG` may
    /// override the default level.
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig {
            level_filter: self.verbosity.tracing_level_filter(),
            ..LogConfig::default()
        };
        config.use_env_filter = !(self.verbosity.is_present() || self.log_level.is_some());
        if let Some(level) = self.log_level {
            config.level_filter = match level {
                LogLevelArg::Error => LevelFilter::ERROR,
                LogLevelArg::Warn => LevelFilter::WARN,
                LogLevelArg::Info => LevelFilter::INFO,
                LogLevelArg::Debug => LevelFilter::DEBUG,
                LogLevelArg::Trace => LevelFilter::TRACE,
            };
        }
        config.format = match self.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        };
        config.log_file = self.log_file.clone();
        config.with_timestamps = self.log_file.is_some();
        config.with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        config
    }
}
