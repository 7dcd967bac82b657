//! Small helpers over `serde_json::Value` shared by the renderer, verifier and
//! expression engine.
use serde_json::Value;

#[must_use]
pub const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Plain string form of a value: strings print unquoted and whole floats
/// print without a fractional part, so `5` and `5.0` share one form.
#[must_use]
pub fn scalar_repr(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => {
            if number.is_f64()
                && let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && float.abs() < 1e15
            {
                return format!("{float:.0}");
            }
            number.to_string()
        }
        Value::Null => "<nil>".to_owned(),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_repr_drops_whole_fraction() -> Result<(), String> {
        let cases = [
            (json!(5), "5"),
            (json!(5.0), "5"),
            (json!(-3.0), "-3"),
            (json!(2.5), "2.5"),
            (json!("text"), "text"),
            (json!(true), "true"),
            (json!(null), "<nil>"),
        ];
        for (value, expected) in cases {
            let actual = scalar_repr(&value);
            if actual != expected {
                return Err(format!("scalar_repr({value}) = {actual}, want {expected}"));
            }
        }
        Ok(())
    }

    #[test]
    fn kind_name_covers_containers() -> Result<(), String> {
        if kind_name(&json!([])) != "array" || kind_name(&json!({})) != "object" {
            return Err("Unexpected container kind".to_owned());
        }
        Ok(())
    }
}
