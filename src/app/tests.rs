use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use tempfile::tempdir;

use super::*;
use crate::args::{PositiveUsize, RunArgs};
use crate::error::{AppError, AppResult, ValidationError};
use crate::logger::LogLevel;
use crate::report::ReportFormat;
use crate::suite::{Expect, Request, Suite, TestCase};
use crate::test_support::{StubReply, run_async_test, spawn_stub_server};

fn case(name: &str, api: &str) -> TestCase {
    TestCase {
        name: name.to_owned(),
        request: Request {
            api: api.to_owned(),
            ..Request::default()
        },
        ..TestCase::default()
    }
}

fn run_args(suite: PathBuf, report_file: PathBuf) -> RunArgs {
    RunArgs {
        suite,
        concurrency: PositiveUsize::default(),
        duration: None,
        timeout: Duration::from_secs(5),
        level: LogLevel::Info,
        report: ReportFormat::Json,
        report_file: Some(report_file),
        ignore_errors: false,
        kubectl: "kubectl".to_owned(),
    }
}

#[test]
fn check_accepts_valid_suite() -> Result<(), String> {
    let mut valid = case("ok", "{{ host }}/users/{{ id }}");
    valid.expect = Expect {
        verify: vec!["len(data) > 0 and data.id == 1".to_owned()],
        ..Expect::default()
    };
    let suite = Suite {
        items: vec![valid],
        ..Suite::default()
    };
    let problems = check_suite(&suite);
    if !problems.is_empty() {
        return Err(format!("Unexpected problems: {:?}", problems));
    }
    Ok(())
}

#[test]
fn check_reports_every_problem() -> Result<(), String> {
    let mut broken = case("broken", "{{ host ");
    broken.request.header.insert("X-Token".to_owned(), "{% if %}".to_owned());
    broken.request.body_from_file = Some(PathBuf::from("/nonexistent/atest/body.json"));
    broken.expect.verify = vec!["data.id ==".to_owned(), "other.id == 1".to_owned()];
    let suite = Suite {
        items: vec![broken],
        ..Suite::default()
    };

    let problems = check_suite(&suite);
    if problems.len() != 5 {
        return Err(format!("Expected 5 problems, got {:?}", problems));
    }
    if !problems.iter().all(|problem| problem.starts_with("case 'broken':")) {
        return Err(format!("Problems lack the case name: {:?}", problems));
    }
    if !problems.iter().any(|problem| problem.contains("header 'X-Token'")) {
        return Err(format!("Header problem missing: {:?}", problems));
    }
    Ok(())
}

#[test]
fn run_writes_report_and_flags_failures() -> AppResult<()> {
    run_async_test(async {
        let server = spawn_stub_server(|request| match request.path.as_str() {
            "/ok" => StubReply::json(200, r#"{"ok": true}"#),
            _ => StubReply::json(500, "{}"),
        })?;
        let dir = tempdir().map_err(|err| AppError::validation(format!("tempdir: {}", err)))?;
        let suite_path = dir.path().join("suite.json");
        let report_path = dir.path().join("report.json");
        let suite = format!(
            r#"{{"vars": {{"host": "{url}"}}, "items": [
                {{"name": "ok", "request": {{"api": "{{{{ host }}}}/ok"}}}},
                {{"name": "down", "request": {{"api": "{{{{ host }}}}/down"}}}}
            ]}}"#,
            url = server.url
        );
        std::fs::write(&suite_path, suite)
            .map_err(|err| AppError::validation(format!("write suite: {}", err)))?;

        let args = RunArgs {
            ignore_errors: true,
            ..run_args(suite_path, report_path.clone())
        };
        match run_suite_file(&args, LogLevel::Info).await {
            Err(AppError::Validation(ValidationError::CasesFailed {
                failed: 1,
                total: 2,
            })) => {}
            other => {
                return Err(AppError::validation(format!(
                    "Expected CasesFailed, got {:?}",
                    other
                )));
            }
        }

        let report = std::fs::read_to_string(&report_path)
            .map_err(|err| AppError::validation(format!("read report: {}", err)))?;
        let report: Value = serde_json::from_str(&report)
            .map_err(|err| AppError::validation(format!("parse report: {}", err)))?;
        let entries = report.as_array().map_or(0, Vec::len);
        if entries != 2 {
            return Err(AppError::validation(format!("Unexpected report: {}", report)));
        }
        let errors: u64 = report
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.get("Error").and_then(Value::as_u64))
            .sum();
        if errors != 1 {
            return Err(AppError::validation(format!("Unexpected error count: {}", report)));
        }
        Ok(())
    })
}

#[test]
fn run_fails_on_missing_suite() -> AppResult<()> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| AppError::validation(format!("tempdir: {}", err)))?;
        let args = run_args(dir.path().join("missing.yaml"), dir.path().join("r.json"));
        match run_suite_file(&args, LogLevel::Info).await {
            Err(AppError::Config(_)) => Ok(()),
            other => Err(AppError::validation(format!(
                "Expected config error, got {:?}",
                other
            ))),
        }
    })
}
