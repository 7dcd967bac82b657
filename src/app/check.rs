use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use tracing::{error, info};

use crate::error::{AppError, AppResult, ValidationError};
use crate::suite::{Suite, TestCase};
use crate::template::{check_syntax, read_body_file};
use crate::verify::compile_expression;

pub(super) fn run_check(path: &Path) -> AppResult<()> {
    let suite = crate::config::load_suite(path)?;
    let problems = check_suite(&suite);
    for problem in &problems {
        error!("{}", problem);
    }
    if !problems.is_empty() {
        return Err(AppError::validation(ValidationError::CheckFailed {
            failures: problems.len(),
        }));
    }
    info!(
        "Suite '{}' is valid ({} case(s)).",
        suite.name,
        suite.items.len()
    );
    Ok(())
}

/// Compiles every template and expression of `suite` without sending
/// anything. Returns one message per problem found.
#[must_use]
pub fn check_suite(suite: &Suite) -> Vec<String> {
    suite.items.iter().flat_map(check_case).collect()
}

fn check_case(case: &TestCase) -> Vec<String> {
    let mut problems = Vec::new();
    let file_body = match case.request.body_from_file.as_deref() {
        Some(path) if case.request.body.is_empty() => match read_body_file(path) {
            Ok(body) => Some(body),
            Err(err) => {
                problems.push(problem(case, &err));
                None
            }
        },
        Some(_) | None => None,
    };
    let body = file_body.as_deref().unwrap_or(&case.request.body);

    let mut templates: Vec<(Cow<'_, str>, &str)> = vec![
        (Cow::Borrowed("method"), case.request.method.as_str()),
        (Cow::Borrowed("api"), case.request.api.as_str()),
        (Cow::Borrowed("body"), body),
        (Cow::Borrowed("expected body"), case.expect.body.as_str()),
    ];
    templates.extend(named("header", &case.request.header));
    templates.extend(named("form", &case.request.form));
    templates.extend(named("expected header", &case.expect.header));

    for (field, template) in &templates {
        if let Err(err) = check_syntax(field, template) {
            problems.push(problem(case, &err));
        }
    }
    for expression in &case.expect.verify {
        if let Err(err) = compile_expression(expression) {
            problems.push(problem(case, &err));
        }
    }
    problems
}

fn named<'a>(
    kind: &'static str,
    map: &'a BTreeMap<String, String>,
) -> impl Iterator<Item = (Cow<'a, str>, &'a str)> {
    map.iter()
        .map(move |(key, value)| (Cow::Owned(format!("{} '{}'", kind, key)), value.as_str()))
}

fn problem(case: &TestCase, err: &dyn std::error::Error) -> String {
    format!("case '{}': {}", case.name, err)
}
