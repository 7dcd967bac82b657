//! Sandboxed boolean expression language used by response verification.
//!
//! Expressions are compiled once against the set of root names available in
//! the environment and then evaluated against a JSON mapping:
//!
//! ```text
//! len(data.items) > 0 && data.items[0].status == "active"
//! data.user.name startsWith "a" ? data.user.age >= 18 : false
//! ```
mod ast;
mod eval;
mod functions;
mod lexer;
mod parser;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::error::ExprError;
use crate::json::kind_name;

use ast::Expr;

pub(crate) use eval::values_equal;

/// A parsed expression whose names and function calls have been checked.
#[derive(Debug, Clone)]
pub struct Program {
    source: String,
    root: Expr,
}

/// Parses `source` and checks that every root name is one of `names`.
///
/// # Errors
///
/// Returns an error on invalid syntax, unknown names, unknown functions or a
/// wrong number of arguments.
pub fn compile<'a, I>(source: &str, names: I) -> Result<Program, ExprError>
where
    I: IntoIterator<Item = &'a str>,
{
    let tokens = lexer::tokenize(source)?;
    let root = parser::parse(tokens)?;
    let known: BTreeSet<&str> = names.into_iter().collect();
    root.check_names(&known)?;
    Ok(Program {
        source: source.to_owned(),
        root,
    })
}

impl Program {
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the program.
    ///
    /// # Errors
    ///
    /// Returns an error when evaluation fails (type mismatch, out of range
    /// index, overflow, division by zero).
    pub fn run(&self, env: &Map<String, Value>) -> Result<Value, ExprError> {
        eval::evaluate(&self.root, env).map(std::borrow::Cow::into_owned)
    }

    /// Evaluates the program and requires a boolean result.
    ///
    /// # Errors
    ///
    /// Returns an error when evaluation fails or the result is not a bool.
    pub fn run_bool(&self, env: &Map<String, Value>) -> Result<bool, ExprError> {
        let value = eval::evaluate(&self.root, env)?;
        match value.as_ref() {
            Value::Bool(result) => Ok(*result),
            other => Err(ExprError::NotBoolean {
                kind: kind_name(other),
            }),
        }
    }
}
