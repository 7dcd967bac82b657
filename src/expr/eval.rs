use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::{Map, Number, Value};

use crate::error::ExprError;
use crate::json::kind_name;

use super::ast::{BinaryOp, Expr, UnaryOp};

pub(super) fn evaluate<'a>(
    expr: &'a Expr,
    env: &'a Map<String, Value>,
) -> Result<Cow<'a, Value>, ExprError> {
    match expr {
        Expr::Literal(value) => Ok(Cow::Borrowed(value)),
        Expr::Array(items) => items
            .iter()
            .map(|item| evaluate(item, env).map(Cow::into_owned))
            .collect::<Result<Vec<_>, _>>()
            .map(|items| Cow::Owned(Value::Array(items))),
        Expr::Name(name) => env
            .get(name)
            .map(Cow::Borrowed)
            .ok_or_else(|| ExprError::UnknownName { name: name.clone() }),
        Expr::Member { target, field } => member(evaluate(target, env)?, field),
        Expr::Index { target, index } => {
            let target = evaluate(target, env)?;
            let index = evaluate(index, env)?;
            element(target, &index)
        }
        Expr::Call { function, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, env).map(Cow::into_owned))
                .collect::<Result<Vec<_>, _>>()?;
            function.apply(&args).map(Cow::Owned)
        }
        Expr::Unary { op, operand } => {
            let operand = evaluate(operand, env)?;
            unary(*op, &operand).map(Cow::Owned)
        }
        Expr::Binary { op, left, right } => binary(*op, left, right, env).map(Cow::Owned),
        Expr::Conditional {
            condition,
            then,
            otherwise,
        } => {
            if expect_bool("?:", evaluate(condition, env)?.as_ref())? {
                evaluate(then, env)
            } else {
                evaluate(otherwise, env)
            }
        }
    }
}

fn member<'a>(target: Cow<'a, Value>, field: &str) -> Result<Cow<'a, Value>, ExprError> {
    if !target.is_object() {
        return Err(ExprError::type_error(format!(
            "cannot access field '{field}' on {}",
            kind_name(&target)
        )));
    }
    Ok(match target {
        Cow::Borrowed(value) => value.get(field).map_or(Cow::Owned(Value::Null), Cow::Borrowed),
        Cow::Owned(mut value) => Cow::Owned(
            value
                .get_mut(field)
                .map(Value::take)
                .unwrap_or(Value::Null),
        ),
    })
}

fn element<'a>(target: Cow<'a, Value>, index: &Value) -> Result<Cow<'a, Value>, ExprError> {
    match (target.as_ref(), index) {
        (Value::Object(_), Value::String(key)) => member(target, key),
        (Value::Array(items), Value::Number(number)) => {
            let position = resolve_index(number, items.len())?;
            Ok(match target {
                Cow::Borrowed(value) => value
                    .get(position)
                    .map_or(Cow::Owned(Value::Null), Cow::Borrowed),
                Cow::Owned(mut value) => Cow::Owned(
                    value
                        .get_mut(position)
                        .map(Value::take)
                        .unwrap_or(Value::Null),
                ),
            })
        }
        (Value::String(text), Value::Number(number)) => {
            let chars: Vec<char> = text.chars().collect();
            let position = resolve_index(number, chars.len())?;
            Ok(Cow::Owned(
                chars
                    .get(position)
                    .map_or(Value::Null, |ch| Value::String(ch.to_string())),
            ))
        }
        (target_value, _) => Err(ExprError::type_error(format!(
            "cannot index {} with {}",
            kind_name(target_value),
            kind_name(index)
        ))),
    }
}

fn resolve_index(number: &Number, len: usize) -> Result<usize, ExprError> {
    let index = number
        .as_i64()
        .ok_or_else(|| ExprError::type_error(format!("index {number} is not an integer")))?;
    let out_of_range = || ExprError::IndexOutOfRange { index, len };
    let signed_len = i64::try_from(len).ok().ok_or(ExprError::Overflow)?;
    let resolved = if index < 0 {
        signed_len.checked_add(index).ok_or_else(out_of_range)?
    } else {
        index
    };
    if resolved < 0 || resolved >= signed_len {
        return Err(out_of_range());
    }
    usize::try_from(resolved).ok().ok_or_else(out_of_range)
}

fn unary(op: UnaryOp, operand: &Value) -> Result<Value, ExprError> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!expect_bool("!", operand)?)),
        UnaryOp::Neg => match as_num(operand) {
            Some(Num::Int(int)) => int.checked_neg().map(Value::from).ok_or(ExprError::Overflow),
            Some(Num::Float(float)) => float_value(negate(float)),
            None => Err(ExprError::type_error(format!(
                "cannot negate {}",
                kind_name(operand)
            ))),
        },
    }
}

fn binary(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    env: &Map<String, Value>,
) -> Result<Value, ExprError> {
    if matches!(op, BinaryOp::And | BinaryOp::Or) {
        let left = expect_bool(op.symbol(), evaluate(left, env)?.as_ref())?;
        let decided = if op == BinaryOp::And { !left } else { left };
        if decided {
            return Ok(Value::Bool(left));
        }
        let right = expect_bool(op.symbol(), evaluate(right, env)?.as_ref())?;
        return Ok(Value::Bool(right));
    }

    let left = evaluate(left, env)?;
    let right = evaluate(right, env)?;
    let (left, right) = (left.as_ref(), right.as_ref());
    match op {
        BinaryOp::Eq => Ok(Value::Bool(values_equal(left, right))),
        BinaryOp::Ne => Ok(Value::Bool(!values_equal(left, right))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare(left, right).ok_or_else(|| mismatch(op, left, right))?;
            let result = match ordering {
                Ordering::Less => matches!(op, BinaryOp::Lt | BinaryOp::Le),
                Ordering::Equal => matches!(op, BinaryOp::Le | BinaryOp::Ge),
                Ordering::Greater => matches!(op, BinaryOp::Gt | BinaryOp::Ge),
            };
            Ok(Value::Bool(result))
        }
        BinaryOp::In => contains(op, right, left).map(Value::Bool),
        BinaryOp::NotIn => contains(op, right, left).map(|found| Value::Bool(!found)),
        BinaryOp::Contains => contains(op, left, right).map(Value::Bool),
        BinaryOp::StartsWith | BinaryOp::EndsWith => match (left, right) {
            (Value::String(text), Value::String(affix)) => Ok(Value::Bool(
                if op == BinaryOp::StartsWith {
                    text.starts_with(affix.as_str())
                } else {
                    text.ends_with(affix.as_str())
                },
            )),
            _ => Err(mismatch(op, left, right)),
        },
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            arithmetic(op, left, right)
        }
        BinaryOp::And | BinaryOp::Or => Err(mismatch(op, left, right)),
    }
}

fn contains(op: BinaryOp, haystack: &Value, needle: &Value) -> Result<bool, ExprError> {
    match (haystack, needle) {
        (Value::Array(items), _) => Ok(items.iter().any(|item| values_equal(item, needle))),
        (Value::Object(map), Value::String(key)) => Ok(map.contains_key(key)),
        (Value::String(text), Value::String(part)) => Ok(text.contains(part.as_str())),
        _ => Err(mismatch(op, needle, haystack)),
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, ExprError> {
    if op == BinaryOp::Add {
        match (left, right) {
            (Value::String(a), Value::String(b)) => return Ok(Value::String(format!("{a}{b}"))),
            (Value::Array(a), Value::Array(b)) => {
                return Ok(Value::Array(a.iter().chain(b).cloned().collect()));
            }
            _ => {}
        }
    }

    let (Some(lhs), Some(rhs)) = (as_num(left), as_num(right)) else {
        return Err(mismatch(op, left, right));
    };
    match (op, lhs, rhs) {
        (BinaryOp::Div, _, _) => {
            let divisor = rhs.to_f64();
            if divisor == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            float_op(op, lhs.to_f64(), divisor).map_or_else(|| Err(mismatch(op, left, right)), float_value)
        }
        (BinaryOp::Rem, Num::Int(a), Num::Int(b)) => {
            if b == 0 {
                return Err(ExprError::DivisionByZero);
            }
            a.checked_rem(b).map(Value::from).ok_or(ExprError::Overflow)
        }
        (BinaryOp::Add, Num::Int(a), Num::Int(b)) => {
            a.checked_add(b).map(Value::from).ok_or(ExprError::Overflow)
        }
        (BinaryOp::Sub, Num::Int(a), Num::Int(b)) => {
            a.checked_sub(b).map(Value::from).ok_or(ExprError::Overflow)
        }
        (BinaryOp::Mul, Num::Int(a), Num::Int(b)) => {
            a.checked_mul(b).map(Value::from).ok_or(ExprError::Overflow)
        }
        _ => float_op(op, lhs.to_f64(), rhs.to_f64())
            .map_or_else(|| Err(mismatch(op, left, right)), float_value),
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "non-integer operands are evaluated in floating point"
)]
const fn float_op(op: BinaryOp, left: f64, right: f64) -> Option<f64> {
    match op {
        BinaryOp::Add => Some(left + right),
        BinaryOp::Sub => Some(left - right),
        BinaryOp::Mul => Some(left * right),
        BinaryOp::Div => Some(left / right),
        BinaryOp::Or
        | BinaryOp::And
        | BinaryOp::Eq
        | BinaryOp::Ne
        | BinaryOp::Lt
        | BinaryOp::Le
        | BinaryOp::Gt
        | BinaryOp::Ge
        | BinaryOp::In
        | BinaryOp::NotIn
        | BinaryOp::Contains
        | BinaryOp::StartsWith
        | BinaryOp::EndsWith
        | BinaryOp::Rem => None,
    }
}

#[expect(clippy::float_arithmetic, reason = "unary minus on a float operand")]
const fn negate(value: f64) -> f64 {
    -value
}

fn float_value(value: f64) -> Result<Value, ExprError> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or(ExprError::Overflow)
}

#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    const fn to_f64(self) -> f64 {
        match self {
            Self::Int(int) => int as f64,
            Self::Float(float) => float,
        }
    }
}

fn as_num(value: &Value) -> Option<Num> {
    let Value::Number(number) = value else {
        return None;
    };
    number
        .as_i64()
        .map(Num::Int)
        .or_else(|| number.as_f64().map(Num::Float))
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (as_num(left), as_num(right)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => Some(a.cmp(&b)),
        (Some(a), Some(b)) => a.to_f64().partial_cmp(&b.to_f64()),
        _ => match (left, right) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        },
    }
}

/// Equality where numbers compare by value across integer and float.
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => compare(left, right) == Some(Ordering::Equal),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => left == right,
    }
}

fn expect_bool(op: &str, value: &Value) -> Result<bool, ExprError> {
    value.as_bool().ok_or_else(|| {
        ExprError::type_error(format!(
            "operator {op} requires bool, got {}",
            kind_name(value)
        ))
    })
}

fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> ExprError {
    ExprError::type_error(format!(
        "operator {} not defined between {} and {}",
        op.symbol(),
        kind_name(left),
        kind_name(right)
    ))
}
