use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::logger::LogLevel;
use crate::report::ReportFormat;
use crate::runner::DEFAULT_KUBECTL;

use super::parsers::{parse_duration_arg, parse_positive_usize};
use super::types::PositiveUsize;

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run every case of a suite and print the per-endpoint report
    Run(RunArgs),
    /// Load a suite and compile its templates and expressions without sending requests
    Check(CheckArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Suite file (.yaml, .yml, .toml or .json)
    #[arg(value_name = "SUITE", env = "ATEST_SUITE")]
    pub suite: PathBuf,

    /// Number of workers running the suite in parallel
    #[arg(
        long,
        short = 'c',
        env = "ATEST_CONCURRENCY",
        default_value = "1",
        value_parser = parse_positive_usize
    )]
    pub concurrency: PositiveUsize,

    /// Repeat the suite until this much time has passed (supports ms/s/m/h)
    #[arg(long, short = 'd', env = "ATEST_DURATION", value_parser = parse_duration_arg)]
    pub duration: Option<Duration>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(
        long,
        short = 't',
        env = "ATEST_TIMEOUT",
        default_value = "10s",
        value_parser = parse_duration_arg
    )]
    pub timeout: Duration,

    /// Runner log level
    #[arg(long, value_enum, env = "ATEST_LEVEL", default_value_t = LogLevel::Info)]
    pub level: LogLevel,

    /// Report format
    #[arg(long, value_enum, env = "ATEST_REPORT", default_value_t = ReportFormat::Text)]
    pub report: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(long = "report-file", env = "ATEST_REPORT_FILE")]
    pub report_file: Option<PathBuf>,

    /// Keep running the remaining cases after a failure
    #[arg(long = "ignore-errors", env = "ATEST_IGNORE_ERRORS")]
    pub ignore_errors: bool,

    /// Program used to apply and delete prepared resources
    #[arg(long, env = "ATEST_KUBECTL", default_value = DEFAULT_KUBECTL)]
    pub kubectl: String,
}

#[derive(Debug, Args, Clone)]
pub struct CheckArgs {
    /// Suite file (.yaml, .yml, .toml or .json)
    #[arg(value_name = "SUITE", env = "ATEST_SUITE")]
    pub suite: PathBuf,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Declarative HTTP API testing in Rust - templated requests, layered response verification, and per-endpoint timing reports."
)]
pub struct AtestArgs {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true, env = "ATEST_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl AtestArgs {
    /// Effective runner level: `--verbose` forces debug.
    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        if self.verbose {
            return LogLevel::Debug;
        }
        match &self.command {
            Command::Run(run) => run.level,
            Command::Check(_) => LogLevel::Info,
        }
    }
}
