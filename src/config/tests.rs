use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::tempdir;

use super::*;
use crate::error::{AppError, AppResult, ConfigError};

const YAML_SUITE: &str = r#"
name: users
vars:
  host: http://localhost:8080
items:
  - name: create
    request:
      method: POST
      api: "{{ host }}/users"
      header:
        Content-Type: application/json
      bodyFromFile: body.json
    expect:
      statusCode: 201
      bodyFieldsExpect:
        user/id: 5
      verify:
        - "data.user.id > 0"
    prepare:
      kubernetes:
        - deploy.yaml
    clean:
      cleanPrepare: true
  - name: fetch
    request:
      api: "{{ host }}/users/{{ create.user.id }}"
"#;

fn write_suite(dir: &Path, file: &str, content: &str) -> AppResult<PathBuf> {
    let path = dir.join(file);
    std::fs::write(&path, content)
        .map_err(|err| AppError::validation(format!("write suite failed: {}", err)))?;
    Ok(path)
}

#[test]
fn load_yaml_suite() -> AppResult<()> {
    let dir = tempdir().map_err(|err| AppError::validation(format!("tempdir: {}", err)))?;
    let path = write_suite(dir.path(), "users.yaml", YAML_SUITE)?;
    let suite = load_suite(&path)?;

    if suite.name != "users" || suite.vars.get("host") != Some(&json!("http://localhost:8080")) {
        return Err(AppError::validation(format!("Unexpected suite: {:?}", suite)));
    }
    let [create, fetch] = suite.items.as_slice() else {
        return Err(AppError::validation("Expected two cases"));
    };
    if create.request.method != "POST" || create.expect.status_code != 201 {
        return Err(AppError::validation("Unexpected create request"));
    }
    if create.request.body_from_file.as_deref() != Some(dir.path().join("body.json").as_path()) {
        return Err(AppError::validation(format!(
            "Body file not resolved: {:?}",
            create.request.body_from_file
        )));
    }
    if create.expect.body_fields_expect.get("user/id") != Some(&json!(5))
        || create.expect.verify.len() != 1
    {
        return Err(AppError::validation("Unexpected expectations"));
    }
    if !create.needs_cleanup() || create.prepare.kubernetes != ["deploy.yaml"] {
        return Err(AppError::validation("Unexpected prepare/clean"));
    }
    if fetch.request.method != "GET" || fetch.expect.status_code != 200 {
        return Err(AppError::validation("Defaults not applied"));
    }
    Ok(())
}

#[test]
fn load_toml_and_json_with_snake_case_aliases() -> AppResult<()> {
    let dir = tempdir().map_err(|err| AppError::validation(format!("tempdir: {}", err)))?;
    let toml_path = write_suite(
        dir.path(),
        "smoke.toml",
        r#"
[[items]]
name = "health"
[items.request]
api = "http://localhost/health"
[items.expect]
status_code = 204
"#,
    )?;
    let json_path = write_suite(
        dir.path(),
        "smoke.json",
        r#"{"cases": [{"name": "health", "request": {"api": "http://localhost/health"},
            "expect": {"status": 204, "body_fields_expect": {"ok": true}}}]}"#,
    )?;

    for path in [toml_path, json_path] {
        let suite = load_suite(&path)?;
        if suite.name != "smoke" {
            return Err(AppError::validation(format!(
                "Expected file stem as name, got {}",
                suite.name
            )));
        }
        let status = suite.items.first().map(|case| case.expect.status_code);
        if status != Some(204) {
            return Err(AppError::validation(format!(
                "{}: unexpected status {:?}",
                path.display(),
                status
            )));
        }
    }
    Ok(())
}

#[test]
fn absolute_body_file_is_kept() -> AppResult<()> {
    let suite = parse_suite(
        Path::new("s.json"),
        r#"{"items": [{"name": "a", "request": {"api": "http://x", "bodyFromFile": "/tmp/b.json"}}]}"#,
    )?;
    let file = suite
        .items
        .first()
        .and_then(|case| case.request.body_from_file.clone());
    if file != Some(PathBuf::from("/tmp/b.json")) {
        return Err(AppError::validation(format!("Unexpected body file: {:?}", file)));
    }
    Ok(())
}

#[test]
fn rejects_unknown_or_missing_extension() -> AppResult<()> {
    match parse_suite(Path::new("suite.ini"), "") {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "ini" => {}
        other => {
            return Err(AppError::validation(format!(
                "Expected UnsupportedExtension, got {:?}",
                other
            )));
        }
    }
    match parse_suite(Path::new("suite"), "") {
        Err(AppError::Config(ConfigError::MissingExtension)) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected MissingExtension, got {:?}",
            other
        ))),
    }
}

#[test]
fn reports_parse_and_read_errors() -> AppResult<()> {
    let dir = tempdir().map_err(|err| AppError::validation(format!("tempdir: {}", err)))?;
    let broken = write_suite(dir.path(), "broken.yaml", "items: [")?;
    match load_suite(&broken) {
        Err(AppError::Config(ConfigError::ParseYaml { .. })) => {}
        other => {
            return Err(AppError::validation(format!(
                "Expected ParseYaml, got {:?}",
                other
            )));
        }
    }
    match load_suite(&dir.path().join("missing.yaml")) {
        Err(AppError::Config(ConfigError::ReadSuite { .. })) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected ReadSuite, got {:?}",
            other
        ))),
    }
}

#[test]
fn validation_rejects_bad_suites() -> AppResult<()> {
    let dir = tempdir().map_err(|err| AppError::validation(format!("tempdir: {}", err)))?;
    let cases: [(&str, &str, fn(&ConfigError) -> bool); 4] = [
        ("empty.json", r#"{"items": []}"#, |err| {
            matches!(err, ConfigError::EmptySuite { .. })
        }),
        (
            "unnamed.json",
            r#"{"items": [{"name": " ", "request": {"api": "http://x"}}]}"#,
            |err| matches!(err, ConfigError::EmptyCaseName { index: 0 }),
        ),
        (
            "dupes.json",
            r#"{"items": [{"name": "a", "request": {"api": "http://x"}},
                          {"name": "a", "request": {"api": "http://y"}}]}"#,
            |err| matches!(err, ConfigError::DuplicateCaseName { name } if name == "a"),
        ),
        (
            "noapi.json",
            r#"{"items": [{"name": "a", "request": {"api": ""}}]}"#,
            |err| matches!(err, ConfigError::MissingApi { .. }),
        ),
    ];
    for (file, content, is_expected) in cases {
        let path = write_suite(dir.path(), file, content)?;
        match load_suite(&path) {
            Err(AppError::Config(err)) if is_expected(&err) => {}
            other => {
                return Err(AppError::validation(format!(
                    "{}: unexpected result {:?}",
                    file, other
                )));
            }
        }
    }
    Ok(())
}
