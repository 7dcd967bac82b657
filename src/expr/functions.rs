use serde_json::{Number, Value};

use crate::error::ExprError;
use crate::json::{kind_name, scalar_repr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Function {
    Len,
    Abs,
    Int,
    Float,
    String,
    Upper,
    Lower,
    Trim,
    Keys,
    Values,
    First,
    Last,
}

impl Function {
    pub(super) fn lookup(name: &str) -> Option<Self> {
        let function = match name {
            "len" => Self::Len,
            "abs" => Self::Abs,
            "int" => Self::Int,
            "float" => Self::Float,
            "string" => Self::String,
            "upper" => Self::Upper,
            "lower" => Self::Lower,
            "trim" => Self::Trim,
            "keys" => Self::Keys,
            "values" => Self::Values,
            "first" => Self::First,
            "last" => Self::Last,
            _ => return None,
        };
        Some(function)
    }

    pub(super) const fn name(self) -> &'static str {
        match self {
            Self::Len => "len",
            Self::Abs => "abs",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Trim => "trim",
            Self::Keys => "keys",
            Self::Values => "values",
            Self::First => "first",
            Self::Last => "last",
        }
    }

    pub(super) const fn arity(self) -> usize {
        1
    }

    pub(super) fn apply(self, args: &[Value]) -> Result<Value, ExprError> {
        let [arg] = args else {
            return Err(ExprError::Arity {
                function: self.name().to_owned(),
                expected: self.arity(),
                actual: args.len(),
            });
        };
        match self {
            Self::Len => len(arg),
            Self::Abs => abs(arg),
            Self::Int => to_int(arg),
            Self::Float => to_float(arg),
            Self::String => Ok(Value::String(scalar_repr(arg))),
            Self::Upper => self.map_str(arg, str::to_uppercase),
            Self::Lower => self.map_str(arg, str::to_lowercase),
            Self::Trim => self.map_str(arg, |text| text.trim().to_owned()),
            Self::Keys => match arg {
                Value::Object(map) => Ok(Value::Array(
                    map.keys().cloned().map(Value::String).collect(),
                )),
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                    Err(self.unsupported(arg))
                }
            },
            Self::Values => match arg {
                Value::Object(map) => Ok(Value::Array(map.values().cloned().collect())),
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                    Err(self.unsupported(arg))
                }
            },
            Self::First => self.edge(arg, true),
            Self::Last => self.edge(arg, false),
        }
    }

    fn map_str(self, arg: &Value, map: impl Fn(&str) -> String) -> Result<Value, ExprError> {
        arg.as_str()
            .map(|text| Value::String(map(text)))
            .ok_or_else(|| self.unsupported(arg))
    }

    fn edge(self, arg: &Value, first: bool) -> Result<Value, ExprError> {
        match arg {
            Value::Array(items) => {
                let item = if first { items.first() } else { items.last() };
                Ok(item.cloned().unwrap_or(Value::Null))
            }
            Value::String(text) => {
                let ch = if first {
                    text.chars().next()
                } else {
                    text.chars().next_back()
                };
                Ok(ch.map_or(Value::Null, |ch| Value::String(ch.to_string())))
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Object(_) => {
                Err(self.unsupported(arg))
            }
        }
    }

    fn unsupported(self, arg: &Value) -> ExprError {
        ExprError::type_error(format!(
            "{}() does not accept {}",
            self.name(),
            kind_name(arg)
        ))
    }
}

fn len(arg: &Value) -> Result<Value, ExprError> {
    let count = match arg {
        Value::String(text) => text.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::Null | Value::Bool(_) | Value::Number(_) => {
            return Err(Function::Len.unsupported(arg));
        }
    };
    Ok(Value::from(count))
}

fn abs(arg: &Value) -> Result<Value, ExprError> {
    if let Some(int) = arg.as_i64() {
        return int.checked_abs().map(Value::from).ok_or(ExprError::Overflow);
    }
    arg.as_f64()
        .filter(|_| arg.is_number())
        .and_then(|float| Number::from_f64(float.abs()))
        .map(Value::Number)
        .ok_or_else(|| Function::Abs.unsupported(arg))
}

fn to_int(arg: &Value) -> Result<Value, ExprError> {
    let float = match arg {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(Value::from(int));
            }
            number.as_f64().unwrap_or(f64::NAN)
        }
        Value::String(text) => {
            let text = text.trim();
            if let Ok(int) = text.parse::<i64>() {
                return Ok(Value::from(int));
            }
            text.parse::<f64>().map_err(|err| {
                ExprError::type_error(format!("int() cannot parse {text:?}: {err}"))
            })?
        }
        Value::Bool(flag) => return Ok(Value::from(i64::from(*flag))),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            return Err(Function::Int.unsupported(arg));
        }
    };
    truncate_to_i64(float).map(Value::from).ok_or(ExprError::Overflow)
}

/// Truncates toward zero. `None` for NaN, infinities and values outside the
/// `i64` range.
fn truncate_to_i64(float: f64) -> Option<i64> {
    let truncated = float.trunc();
    if !truncated.is_finite() {
        return None;
    }
    format!("{truncated:.0}").parse::<i64>().ok()
}

fn to_float(arg: &Value) -> Result<Value, ExprError> {
    let float = match arg {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => Some(text.trim().parse::<f64>().map_err(|err| {
            ExprError::type_error(format!("float() cannot parse {text:?}: {err}"))
        })?),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };
    float
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| Function::Float.unsupported(arg))
}
