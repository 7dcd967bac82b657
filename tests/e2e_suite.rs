
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::tempdir;

use atest::error::{FailureKind, ResourceError};
use atest::logger::LogLevel;
use atest::report::{MemoryReporter, TestReporter};
use atest::runner::{CaseRunner, ResourcePort, RunnerConfig, SuiteOptions, run_suite};
use atest::shutdown::shutdown_channel;
use support_api::{describe, run_atest, spawn_api_server};

const PASSING_SUITE: &str = r#"
name: users
vars:
  host: "{{HOST}}"
items:
  - name: list
    request:
      api: "{{ host }}/users"
    expect:
      bodyFieldsExpect:
        user/id: 5
        user/name: ada
  - name: detail
    request:
      api: "{{ host }}/users/{{ list.user.id }}"
    expect:
      verify:
        - "len(data.tags) == 2"
        - "'admin' in data.tags"
  - name: echo
    request:
      method: post
      api: "{{ host }}/echo"
      header:
        Content-Type: application/json
      body: '{"name": "{{ list.user.name }}", "id": {{ detail.id }} }'
    expect:
      header:
        content-type: application/json
      bodyFieldsExpect:
        name: ada
        id: 5
  - name: health
    request:
      api: "{{ host }}/health"
    expect:
      body: "{\"status\":\"ok\"}\n"
"#;

fn write_suite(dir: &Path, file: &str, template: &str, url: &str) -> Result<PathBuf, String> {
    let path = dir.join(file);
    fs::write(&path, template.replace("{{HOST}}", url))
        .map_err(|err| format!("write suite failed: {}", err))?;
    Ok(path)
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn e2e_run_passing_suite_prints_json_report() -> Result<(), String> {
    let (url, _server) = spawn_api_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let suite = write_suite(dir.path(), "users.yaml", PASSING_SUITE, &url)?;

    let output = run_atest(["run", &path_arg(&suite), "--report", "json"])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let report: Value = serde_json::from_slice(&output.stdout)
        .map_err(|err| format!("report is not JSON: {}\n{}", err, describe(&output)))?;
    let entries = report.as_array().ok_or("report is not an array")?;
    if entries.len() != 4 {
        return Err(format!("Expected 4 endpoints, got {}", report));
    }
    let echo = entries
        .iter()
        .find(|entry| entry.get("Method") == Some(&json!("POST")))
        .ok_or("missing POST entry")?;
    if echo.get("API") != Some(&json!(format!("{}/echo", url))) {
        return Err(format!("Unexpected echo entry: {}", echo));
    }
    if entries.iter().any(|entry| entry.get("Error") != Some(&json!(0))) {
        return Err(format!("Unexpected errors: {}", report));
    }
    Ok(())
}

#[test]
fn e2e_run_failing_case_exits_non_zero() -> Result<(), String> {
    let (url, _server) = spawn_api_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let suite = write_suite(
        dir.path(),
        "missing.json",
        r#"{"vars": {"host": "{{HOST}}"},
            "items": [{"name": "gone", "request": {"api": "{{ host }}/gone"}}]}"#,
        &url,
    )?;
    let report = dir.path().join("report.txt");

    let output = run_atest([
        "run",
        &path_arg(&suite),
        "--report-file",
        &path_arg(&report),
    ])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", describe(&output)));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("expected status 200, actual 404") {
        return Err(format!("Missing mismatch message\n{}", describe(&output)));
    }
    let text = fs::read_to_string(&report).map_err(|err| format!("read report: {}", err))?;
    if !text.contains(&format!("{}/gone", url)) {
        return Err(format!("Unexpected text report:\n{}", text));
    }
    Ok(())
}

#[test]
fn e2e_check_flags_broken_expressions() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let good = write_suite(dir.path(), "good.yaml", PASSING_SUITE, "http://localhost")?;
    let output = run_atest(["check", &path_arg(&good)])?;
    if !output.status.success() {
        return Err(describe(&output));
    }

    let broken = write_suite(
        dir.path(),
        "broken.toml",
        r#"
[[items]]
name = "bad"
[items.request]
api = "http://localhost/{{ id"
[items.expect]
verify = ["data.id >"]
"#,
        "",
    )?;
    let output = run_atest(["check", &path_arg(&broken)])?;
    if output.status.success() {
        return Err(format!("Expected check failure\n{}", describe(&output)));
    }
    Ok(())
}

/// Records calls so the test can see the prepare and cleanup order.
#[derive(Default)]
struct RecordingResources {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl ResourcePort for RecordingResources {
    async fn apply(&self, resource: &str) -> Result<(), ResourceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("apply {}", resource));
        }
        Ok(())
    }

    async fn delete(&self, resource: &str) -> Result<(), ResourceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("delete {}", resource));
        }
        Ok(())
    }
}

#[test]
fn library_runs_suite_with_custom_resources() -> Result<(), String> {
    let (url, _server) = spawn_api_server()?;
    let suite = atest::config::parse_suite(
        Path::new("inline.json"),
        &format!(
            r#"{{"items": [
                {{"name": "health", "request": {{"api": "{url}/health"}},
                  "expect": {{"body": "{{\"status\":\"ok\"}}"}},
                  "prepare": {{"kubernetes": ["db.yaml", "app.yaml"]}},
                  "clean": {{"cleanPrepare": true}}}},
                {{"name": "typo", "request": {{"api": "{url}/users"}},
                  "expect": {{"verify": ["data.total == 2"]}}}}
            ]}}"#
        ),
    )
    .map_err(|err| err.to_string())?;

    let reporter = Arc::new(MemoryReporter::new());
    let resources = Arc::new(RecordingResources::default());
    let runner = CaseRunner::new(RunnerConfig {
        log_level: LogLevel::Debug,
        reporter: Arc::clone(&reporter) as Arc<dyn TestReporter>,
        resources: Arc::clone(&resources) as Arc<dyn ResourcePort>,
        ..RunnerConfig::default()
    })
    .map_err(|err| err.to_string())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("runtime: {}", err))?;
    let (shutdown_tx, _) = shutdown_channel();
    let outcome = runtime
        .block_on(run_suite(
            Arc::new(runner),
            Arc::new(suite),
            SuiteOptions::default(),
            &shutdown_tx,
        ))
        .map_err(|err| err.to_string())?;

    if outcome.passed != 1 || outcome.failed != 1 {
        return Err(format!("Unexpected outcome: {:?}", outcome));
    }
    let failure = outcome.errors.first().ok_or("missing error")?;
    if failure.case != "typo" || failure.kind.label() != "verification" {
        return Err(format!("Unexpected failure: {}", failure));
    }
    if !matches!(*failure.kind, FailureKind::Verify(_)) {
        return Err(format!("Unexpected failure kind: {:?}", failure.kind));
    }
    let calls = resources
        .calls
        .lock()
        .map(|calls| calls.clone())
        .map_err(|err| err.to_string())?;
    if calls != ["apply db.yaml", "apply app.yaml", "delete app.yaml", "delete db.yaml"] {
        return Err(format!("Unexpected resource calls: {:?}", calls));
    }
    let results = reporter.export_all_report_results();
    if results.len() != 2 || results.iter().map(|result| result.error).sum::<u64>() != 1 {
        return Err(format!("Unexpected report: {:?}", results));
    }
    Ok(())
}
