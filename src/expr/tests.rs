use serde_json::{Map, Value, json};

use super::*;
use crate::error::ExprError;

fn env(data: Value) -> Map<String, Value> {
    let mut env = Map::new();
    env.insert("data".to_owned(), data);
    env
}

fn eval_bool(source: &str, data: Value) -> Result<bool, String> {
    let program =
        compile(source, ["data"]).map_err(|err| format!("compile '{}': {}", source, err))?;
    program
        .run_bool(&env(data))
        .map_err(|err| format!("run '{}': {}", source, err))
}

fn eval(source: &str, data: Value) -> Result<Value, ExprError> {
    compile(source, ["data"])?.run(&env(data))
}

#[test]
fn array_length_checks() -> Result<(), String> {
    if !eval_bool("len(data) == 3", json!([1, 2, 3]))? {
        return Err("Expected len(data) == 3".to_owned());
    }
    if eval_bool("len(data) == 4", json!([1, 2, 3]))? {
        return Err("Expected len(data) == 4 to be false".to_owned());
    }
    Ok(())
}

#[test]
fn boolean_expressions_evaluate() -> Result<(), String> {
    let data = json!({
        "user": {"id": 5, "name": "ada", "tags": ["a", "b"], "score": 2.5},
        "items": [{"status": "active"}, {"status": "done"}],
        "empty": null
    });
    let truthy = [
        "data.user.id == 5",
        "data.user.id == 5.0",
        "data.user['name'] == \"ada\"",
        "data.items[0].status == 'active' && data.items[-1].status == 'done'",
        "len(data.items) > 1 and not (data.user.id < 0)",
        "'a' in data.user.tags",
        "'c' not in data.user.tags",
        "data.user.tags contains 'b'",
        "'user' in data",
        "data.user.name startsWith 'ad' && data.user.name endsWith 'da'",
        "data.user.name contains 'd'",
        "data.user.score * 2 == 5",
        "7 / 2 == 3.5",
        "7 % 4 == 3",
        "-data.user.id == -5",
        "data.missing == nil",
        "data.empty == null",
        "data.user.id > 1 ? data.user.name == 'ada' : false",
        "upper(data.user.name) == 'ADA' && lower('X') == 'x'",
        "trim('  x ') == 'x'",
        "int('42') + 1 == 43 && float('1.5') == 1.5 && int(3.9) == 3",
        "string(5.0) == '5' && string(data.user.id) == '5'",
        "abs(-3) == 3",
        "keys(data.user)[0] == 'id'",
        "len(values(data.user)) == 4",
        "first(data.user.tags) == 'a' && last(data.user.tags) == 'b'",
        "[1, 2] + [3] == [1, 2, 3]",
        "'a' + 'b' == 'ab'",
        "1 < 1.5 && 'abc' < 'abd'",
        "true || data.missing.deep",
        "!(false && data.missing.deep)",
    ];
    for source in truthy {
        if !eval_bool(source, data.clone())? {
            return Err(format!("Expected '{}' to be true", source));
        }
    }
    Ok(())
}

#[test]
fn precedence_follows_arithmetic_rules() -> Result<(), String> {
    let value = eval("1 + 2 * 3 - 4 % 3", json!(null)).map_err(|err| err.to_string())?;
    if value != json!(6) {
        return Err(format!("Unexpected value: {}", value));
    }
    Ok(())
}

#[test]
fn compile_rejects_unknown_names_and_functions() -> Result<(), String> {
    match compile("user.id == 1", ["data"]) {
        Err(ExprError::UnknownName { name }) if name == "user" => {}
        other => return Err(format!("Expected UnknownName, got {:?}", other.err())),
    }
    match compile("size(data) == 1", ["data"]) {
        Err(ExprError::UnknownFunction { name }) if name == "size" => {}
        other => return Err(format!("Expected UnknownFunction, got {:?}", other.err())),
    }
    match compile("len(data, data) == 1", ["data"]) {
        Err(ExprError::Arity {
            expected: 1,
            actual: 2,
            ..
        }) => {}
        other => return Err(format!("Expected Arity, got {:?}", other.err())),
    }
    Ok(())
}

#[test]
fn compile_rejects_bad_syntax() -> Result<(), String> {
    let sources = ["data.id ==", "(data.id", "data.id = 1", "data.id == 'open", "data.", "1 2"];
    for source in sources {
        match compile(source, ["data"]) {
            Err(ExprError::Syntax { .. }) => {}
            other => {
                return Err(format!(
                    "Expected syntax error for '{}', got {:?}",
                    source,
                    other.map(|program| program.source().to_owned())
                ));
            }
        }
    }
    Ok(())
}

#[test]
fn evaluation_errors_are_reported() -> Result<(), String> {
    let cases = [
        ("data[5]", json!([1])),
        ("1 / 0", json!(null)),
        ("9223372036854775807 + 1", json!(null)),
        ("data.a.b", json!({"a": null})),
        ("'a' - 1", json!(null)),
    ];
    for (source, data) in cases {
        if eval(source, data).is_ok() {
            return Err(format!("Expected evaluation error for '{}'", source));
        }
    }
    match eval("data[3]", json!([1, 2])) {
        Err(ExprError::IndexOutOfRange { index: 3, len: 2 }) => {}
        other => return Err(format!("Expected IndexOutOfRange, got {:?}", other)),
    }
    match eval("1 % 0", json!(null)) {
        Err(ExprError::DivisionByZero) => Ok(()),
        other => Err(format!("Expected DivisionByZero, got {:?}", other)),
    }
}

#[test]
fn int_conversion_rejects_out_of_range_floats() -> Result<(), String> {
    for source in ["int('1e30')", "int('-1e30')", "int('inf')", "int('NaN')"] {
        match eval(source, Value::Null) {
            Err(ExprError::Overflow) => {}
            other => return Err(format!("Expected Overflow for {}, got {:?}", source, other)),
        }
    }
    match eval("int('-3.9')", Value::Null) {
        Ok(value) if value == json!(-3) => Ok(()),
        other => Err(format!("Expected -3, got {:?}", other)),
    }
}

#[test]
fn run_bool_requires_boolean_result() -> Result<(), String> {
    let program = compile("len(data)", ["data"]).map_err(|err| err.to_string())?;
    match program.run_bool(&env(json!([1]))) {
        Err(ExprError::NotBoolean { kind: "number" }) => Ok(()),
        other => Err(format!("Expected NotBoolean, got {:?}", other)),
    }
}

#[test]
fn logical_operators_require_booleans() -> Result<(), String> {
    if eval("1 && true", json!(null)).is_ok() {
        return Err("Expected type error for non-bool operand".to_owned());
    }
    Ok(())
}
