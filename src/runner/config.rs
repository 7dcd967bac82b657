use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::logger::LogLevel;
use crate::report::{DiscardReporter, TestReporter};

use super::resources::{KubectlPort, ResourcePort};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything a runner needs, fixed at construction.
#[derive(Clone)]
pub struct RunnerConfig {
    pub log_level: LogLevel,
    pub request_timeout: Duration,
    pub reporter: Arc<dyn TestReporter>,
    pub resources: Arc<dyn ResourcePort>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            reporter: Arc::new(DiscardReporter),
            resources: Arc::new(KubectlPort::default()),
        }
    }
}

impl fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("log_level", &self.log_level)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
