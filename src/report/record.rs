use std::time::Duration;

use chrono::{DateTime, Utc};

/// Outcome of one case run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    pub method: String,
    pub api: String,
    /// Response body, empty when no response was read.
    pub body: String,
    pub begin_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub error: Option<String>,
    /// Kept apart so a cleanup failure never replaces the run error.
    pub cleanup_error: Option<String>,
}

impl ReportRecord {
    /// Starts a record at the current instant.
    #[must_use]
    pub fn begin(method: impl Into<String>, api: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            method: method.into(),
            api: api.into(),
            body: String::new(),
            begin_time: now,
            end_time: now,
            error: None,
            cleanup_error: None,
        }
    }

    /// Stamps the end time.
    pub fn end(&mut self) {
        self.end_time = Utc::now();
    }

    /// Elapsed time between begin and end; zero if the clock went backwards.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end_time
            .signed_duration_since(self.begin_time)
            .to_std()
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn error_count(&self) -> u64 {
        if self.error.is_some() || self.cleanup_error.is_some() {
            1
        } else {
            0
        }
    }
}
