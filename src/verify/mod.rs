//! Layered response verification: status, headers, exact body, JSON field
//! paths and boolean expressions, in that order, stopping at the first failure.
mod body;
mod diff;
mod fields;


pub use body::DecodedBody;
pub use diff::line_diff;
pub use fields::check_fields;

use serde_json::{Map, Value};

use crate::error::{ExprError, VerifyError};
use crate::expr;
use crate::http::RawResponse;
use crate::suite::Expect;

/// Root name that expressions use to reach the decoded body.
pub const EXPRESSION_ROOT: &str = "data";

/// Runs every check of `expect` against `response`.
///
/// Returns the body decoded as a JSON object or array.
///
/// # Errors
///
/// Returns the first failing check. A body that does not decode as a JSON
/// container is a `Decode` failure even when no field or expression checks
/// are declared.
pub fn verify_response(expect: &Expect, response: &RawResponse) -> Result<DecodedBody, VerifyError> {
    check_status(expect.status_code, response.status)?;
    check_headers(expect, response)?;
    check_body(&expect.body, &response.body_text())?;

    let decoded = DecodedBody::decode(&response.body).map_err(VerifyError::Decode)?;
    if let Some(object) = decoded.field_view() {
        check_fields(&expect.body_fields_expect, object)?;
    } else if let Some((key, _)) = expect.body_fields_expect.first_key_value() {
        return Err(VerifyError::FieldNotFound { key: key.clone() });
    }
    check_expressions(&expect.verify, &decoded.expression_env())?;
    Ok(decoded)
}

/// # Errors
///
/// Returns `StatusMismatch` when the codes differ.
pub const fn check_status(expected: u16, actual: u16) -> Result<(), VerifyError> {
    if expected == actual {
        Ok(())
    } else {
        Err(VerifyError::StatusMismatch { expected, actual })
    }
}

/// Subset match: every expected header must equal the actual single value;
/// a missing header reads as an empty string.
///
/// # Errors
///
/// Returns the first `HeaderMismatch` in key order.
pub fn check_headers(expect: &Expect, response: &RawResponse) -> Result<(), VerifyError> {
    for (key, expected) in &expect.header {
        let actual = response.header(key);
        if actual != expected {
            return Err(VerifyError::HeaderMismatch {
                key: key.clone(),
                expected: expected.clone(),
                actual: actual.to_owned(),
            });
        }
    }
    Ok(())
}

/// Exact body comparison against the trimmed expected body; skipped when no
/// body is expected.
///
/// # Errors
///
/// Returns `BodyMismatch` carrying a line diff.
pub fn check_body(expected: &str, actual: &str) -> Result<(), VerifyError> {
    if expected.is_empty() {
        return Ok(());
    }
    let expected = expected.trim();
    if actual == expected {
        return Ok(());
    }
    Err(VerifyError::BodyMismatch {
        diff: line_diff(expected, actual),
    })
}

/// Compiles and evaluates each expression in order.
///
/// # Errors
///
/// Returns the first compile error, evaluation error or `false` result.
pub fn check_expressions(
    expressions: &[String],
    env: &Map<String, Value>,
) -> Result<(), VerifyError> {
    for expression in expressions {
        let program = compile_expression(expression)?;
        match program.run_bool(env) {
            Ok(true) => {}
            Ok(false) => {
                return Err(VerifyError::VerificationFailed {
                    expression: expression.clone(),
                });
            }
            Err(err) => {
                return Err(VerifyError::ExpressionEval {
                    expression: expression.clone(),
                    source: err,
                });
            }
        }
    }
    Ok(())
}

/// Compiles one verification expression against the `data` root.
///
/// # Errors
///
/// Returns `ExpressionCompile` on syntax, name or function errors.
pub fn compile_expression(expression: &str) -> Result<expr::Program, VerifyError> {
    expr::compile(expression, [EXPRESSION_ROOT]).map_err(|err: ExprError| {
        VerifyError::ExpressionCompile {
            expression: expression.to_owned(),
            source: err,
        }
    })
}
