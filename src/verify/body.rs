use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::json::kind_name;

use super::EXPRESSION_ROOT;

/// Response body decoded as a JSON container.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

impl DecodedBody {
    /// # Errors
    ///
    /// Returns an error when the body is not valid JSON or its root is a
    /// scalar.
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|err| DecodeError::Syntax { source: err })?;
        match value {
            Value::Object(map) => Ok(Self::Object(map)),
            Value::Array(items) => Ok(Self::Array(items)),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                Err(DecodeError::UnsupportedRoot {
                    kind: kind_name(&value),
                })
            }
        }
    }

    /// Mapping navigated by field paths; arrays have none.
    #[must_use]
    pub const fn field_view(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            Self::Array(_) => None,
        }
    }

    /// Environment for expressions: the body under the `data` root.
    #[must_use]
    pub fn expression_env(&self) -> Map<String, Value> {
        let mut env = Map::new();
        env.insert(EXPRESSION_ROOT.to_owned(), self.to_value());
        env
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(map) => Value::Object(map.clone()),
            Self::Array(items) => Value::Array(items.clone()),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Object(map) => Value::Object(map),
            Self::Array(items) => Value::Array(items),
        }
    }
}
