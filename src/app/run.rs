use std::sync::Arc;

use tracing::{info, warn};

use crate::args::RunArgs;
use crate::config::load_suite;
use crate::error::{AppError, AppResult, ValidationError};
use crate::logger::LogLevel;
use crate::report::{MemoryReporter, TestReporter};
use crate::runner::{CaseRunner, KubectlPort, RunnerConfig, SuiteOptions, run_suite};
use crate::shutdown::{setup_signal_shutdown_handler, shutdown_channel};

use super::output::write_results;

/// Loads and runs the suite named by `args`, then writes the report.
///
/// The report is written even when cases fail.
///
/// # Errors
///
/// Returns an error when the suite cannot be loaded, the report cannot be
/// written or any case fails.
pub async fn run_suite_file(args: &RunArgs, level: LogLevel) -> AppResult<()> {
    let suite = load_suite(&args.suite)?;
    let reporter = Arc::new(MemoryReporter::new());
    let runner = CaseRunner::new(RunnerConfig {
        log_level: level,
        request_timeout: args.timeout,
        reporter: Arc::clone(&reporter) as Arc<dyn TestReporter>,
        resources: Arc::new(KubectlPort::new(args.kubectl.clone())),
    })?;
    let options = SuiteOptions {
        concurrency: args.concurrency.get(),
        duration: args.duration,
        ignore_errors: args.ignore_errors,
    };

    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let outcome = run_suite(Arc::new(runner), Arc::new(suite), options, &shutdown_tx).await;
    drop(shutdown_tx.send(()));
    signal_handle.await?;
    let outcome = outcome?;

    let results = reporter.export_all_report_results();
    write_results(args.report, &results, args.report_file.as_deref())?;

    if outcome.interrupted {
        warn!("Run interrupted before every case finished.");
    }
    info!(
        "{} passed, {} failed, {} endpoint(s) reported.",
        outcome.passed,
        outcome.failed,
        results.len()
    );
    if !outcome.is_success() {
        return Err(AppError::validation(ValidationError::CasesFailed {
            failed: outcome.failed,
            total: outcome.total(),
        }));
    }
    Ok(())
}
