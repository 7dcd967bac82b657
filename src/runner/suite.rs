use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info};

use crate::error::{AppError, AppResult, CaseError, ValidationError};
use crate::shutdown::{ShutdownReceiver, ShutdownSender};
use crate::suite::Suite;

use super::case::CaseRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteOptions {
    /// Number of workers walking the suite in parallel.
    pub concurrency: usize,
    /// Repeat the suite until this much time has passed.
    pub duration: Option<Duration>,
    /// Keep going after a failed case instead of ending the pass.
    pub ignore_errors: bool,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            duration: None,
            ignore_errors: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct SuiteOutcome {
    pub passed: usize,
    pub failed: usize,
    pub errors: Vec<CaseError>,
    pub interrupted: bool,
}

impl SuiteOutcome {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed.saturating_add(self.failed)
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn merge(&mut self, other: Self) {
        self.passed = self.passed.saturating_add(other.passed);
        self.failed = self.failed.saturating_add(other.failed);
        self.errors.extend(other.errors);
        self.interrupted |= other.interrupted;
    }
}

/// Runs `suite` on `options.concurrency` workers. Each worker keeps its own
/// data context, seeded with the suite vars, and stores every case output
/// under the case name for later cases to template against.
///
/// # Errors
///
/// Returns an error for a zero concurrency or when a worker task panics.
pub async fn run_suite(
    runner: Arc<CaseRunner>,
    suite: Arc<Suite>,
    options: SuiteOptions,
    shutdown_tx: &ShutdownSender,
) -> AppResult<SuiteOutcome> {
    if options.concurrency == 0 {
        return Err(AppError::validation(ValidationError::ConcurrencyZero));
    }
    let deadline = options
        .duration
        .and_then(|duration| Instant::now().checked_add(duration));
    info!(
        "Running suite '{}' ({} case(s)) on {} worker(s)",
        suite.name,
        suite.items.len(),
        options.concurrency
    );

    let mut workers = JoinSet::new();
    for worker in 0..options.concurrency {
        let runner = Arc::clone(&runner);
        let suite = Arc::clone(&suite);
        let shutdown_rx = shutdown_tx.subscribe();
        workers.spawn(async move {
            run_worker(worker, &runner, &suite, options, deadline, shutdown_rx).await
        });
    }

    let mut outcome = SuiteOutcome::default();
    while let Some(joined) = workers.join_next().await {
        outcome.merge(joined?);
    }
    Ok(outcome)
}

async fn run_worker(
    worker: usize,
    runner: &CaseRunner,
    suite: &Suite,
    options: SuiteOptions,
    deadline: Option<Instant>,
    mut shutdown_rx: ShutdownReceiver,
) -> SuiteOutcome {
    let mut outcome = SuiteOutcome::default();
    loop {
        let mut context = Value::Object(suite.vars.clone());
        for case in &suite.items {
            if shutdown_requested(&mut shutdown_rx) {
                outcome.interrupted = true;
                return outcome;
            }
            if deadline.is_some_and(|end| Instant::now() >= end) {
                return outcome;
            }

            match runner.run_case(case, &context, &mut shutdown_rx).await {
                Ok(output) => {
                    outcome.passed = outcome.passed.saturating_add(1);
                    if let Some(map) = context.as_object_mut() {
                        map.insert(case.name.clone(), output);
                    }
                }
                Err(err) => {
                    error!("worker {}: {}", worker, err);
                    outcome.failed = outcome.failed.saturating_add(1);
                    let cancelled = err.is_cancelled();
                    outcome.errors.push(err);
                    if cancelled {
                        outcome.interrupted = true;
                        return outcome;
                    }
                    if !options.ignore_errors {
                        break;
                    }
                }
            }
        }

        match deadline {
            Some(end) if Instant::now() < end => {}
            Some(_) | None => return outcome,
        }
    }
}

fn shutdown_requested(shutdown_rx: &mut ShutdownReceiver) -> bool {
    match shutdown_rx.try_recv() {
        Ok(()) | Err(TryRecvError::Lagged(_)) => true,
        Err(TryRecvError::Empty | TryRecvError::Closed) => false,
    }
}
