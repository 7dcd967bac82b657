use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::VerifyError;
use crate::expr::values_equal;
use crate::json::scalar_repr;

/// Checks slash-delimited paths against the decoded body. Navigation goes
/// through mappings only.
///
/// # Errors
///
/// Returns `FieldNotFound` for a missing path and `FieldMismatch` for an
/// unequal value.
pub fn check_fields(
    expected: &BTreeMap<String, Value>,
    body: &Map<String, Value>,
) -> Result<(), VerifyError> {
    for (key, expected_value) in expected {
        let actual = lookup(body, key).ok_or_else(|| VerifyError::FieldNotFound { key: key.clone() })?;
        if !field_matches(expected_value, actual) {
            return Err(VerifyError::FieldMismatch {
                key: key.clone(),
                expected: expected_value.clone(),
                actual: actual.clone(),
            });
        }
    }
    Ok(())
}

fn lookup<'a>(body: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('/');
    let mut current = body.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Values are equal with numbers compared by value (`2.0` matches `2`), or
/// the expected value is an integer whose string form matches the actual one.
fn field_matches(expected: &Value, actual: &Value) -> bool {
    if values_equal(expected, actual) {
        return true;
    }
    let expected_is_int = expected.as_i64().is_some() || expected.as_u64().is_some();
    expected_is_int && scalar_repr(expected) == scalar_repr(actual)
}
