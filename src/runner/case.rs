use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;

use crate::error::{AppResult, CaseError, FailureKind};
use crate::http::{build_client, build_request, execute};
use crate::logger::CaseLog;
use crate::report::{ReportRecord, TestReporter};
use crate::shutdown::ShutdownReceiver;
use crate::suite::TestCase;
use crate::template::Renderer;
use crate::verify::verify_response;

use super::config::RunnerConfig;
use super::resources::{ResourcePort, apply_all, delete_all};

/// Runs single test cases. Cheap to share across tasks behind an `Arc`.
pub struct CaseRunner {
    client: Client,
    log: CaseLog,
    reporter: Arc<dyn TestReporter>,
    resources: Arc<dyn ResourcePort>,
}

impl CaseRunner {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: RunnerConfig) -> AppResult<Self> {
        Ok(Self {
            client: build_client(config.request_timeout)?,
            log: CaseLog::new(config.log_level),
            reporter: config.reporter,
            resources: config.resources,
        })
    }

    #[must_use]
    pub fn reporter(&self) -> &Arc<dyn TestReporter> {
        &self.reporter
    }

    /// Runs `case` against `data` and returns the decoded response body.
    ///
    /// Exactly one record reaches the reporter per call. A cleanup failure
    /// becomes the returned error and carries the run error, if any.
    ///
    /// # Errors
    ///
    /// Returns the first failure, wrapped with the case name.
    pub async fn run_case(
        &self,
        case: &TestCase,
        data: &Value,
        shutdown_rx: &mut ShutdownReceiver,
    ) -> Result<Value, CaseError> {
        self.log.info(format_args!("start to run: '{}'", case.name));

        if let Err(err) = apply_all(self.resources.as_ref(), &case.prepare.kubernetes).await {
            let kind = FailureKind::Prepare(err);
            let mut record = ReportRecord::begin(&case.request.method, &case.request.api);
            record.error = Some(kind.to_string());
            self.reporter.put_record(record);
            return Err(CaseError::new(&case.name, kind));
        }

        let mut record = ReportRecord::begin(&case.request.method, &case.request.api);
        let run = self.send_and_verify(case, data, shutdown_rx, &mut record).await;
        record.end();

        let cleanup = if case.needs_cleanup() {
            delete_all(self.resources.as_ref(), &case.prepare.kubernetes)
                .await
                .err()
        } else {
            None
        };

        record.error = run.as_ref().err().map(ToString::to_string);
        record.cleanup_error = cleanup
            .as_ref()
            .map(|err| format!("failed to clean up, error: {err}"));
        self.reporter.put_record(record);

        match (run, cleanup) {
            (Ok(output), None) => {
                self.log.debug(format_args!("case '{}' passed", case.name));
                Ok(output)
            }
            (Err(kind), None) => Err(CaseError::new(&case.name, kind)),
            (run, Some(source)) => Err(CaseError::new(
                &case.name,
                FailureKind::Cleanup {
                    source,
                    run: run.err().map(Box::new),
                },
            )),
        }
    }

    async fn send_and_verify(
        &self,
        case: &TestCase,
        data: &Value,
        shutdown_rx: &mut ShutdownReceiver,
        record: &mut ReportRecord,
    ) -> Result<Value, FailureKind> {
        let renderer = Renderer::new(data)?;
        let rendered = renderer.render_request(&case.request)?;
        record.method = rendered.method.to_ascii_uppercase();
        record.api.clone_from(&rendered.api);

        let request = build_request(&self.client, &rendered)?;
        self.log.info(format_args!("start to send request to {}", rendered.api));
        let response = execute(&self.client, request, shutdown_rx).await?;
        record.body = response.body_text().into_owned();
        self.log.debug(format_args!(
            "{} {} responded {} in {:?}",
            rendered.method, rendered.api, response.status, response.elapsed
        ));
        self.log.debug(format_args!("response body: {}", record.body));

        let expect = renderer.render_expect(&case.expect)?;
        let decoded = verify_response(&expect, &response)?;
        Ok(decoded.into_value())
    }
}
