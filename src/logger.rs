use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global subscriber. `ATEST_LOG` wins over `RUST_LOG`; without
/// either, `verbose` selects debug over info.
pub fn init_logging(verbose: bool) {
    let filter = std::env::var("ATEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| {
                if verbose {
                    EnvFilter::new("debug")
                } else {
                    EnvFilter::new("info")
                }
            },
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

/// Threshold for the messages a runner emits about the cases it drives.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Debug,
}

/// Level-filtered sink carried by a runner.
#[derive(Debug, Clone, Default)]
pub struct CaseLog {
    level: LogLevel,
}

impl CaseLog {
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    pub fn info(&self, message: fmt::Arguments<'_>) {
        info!("{}", message);
    }

    pub fn debug(&self, message: fmt::Arguments<'_>) {
        if self.level >= LogLevel::Debug {
            debug!("{}", message);
        }
    }
}
