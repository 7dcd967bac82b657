use serde_json::Value;
use thiserror::Error;

use super::ExprError;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{source}")]
    Syntax {
        #[source]
        source: serde_json::Error,
    },
    #[error("expected a JSON object or array, got {kind}")]
    UnsupportedRoot { kind: &'static str },
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("expected status {expected}, actual {actual}")]
    StatusMismatch { expected: u16, actual: u16 },
    #[error("header '{key}' expected '{expected}', actual '{actual}'")]
    HeaderMismatch {
        key: String,
        expected: String,
        actual: String,
    },
    #[error("got different response body, diff:\n{diff}")]
    BodyMismatch { diff: String },
    #[error("failed to decode response body: {0}")]
    Decode(#[source] DecodeError),
    #[error("not found field: {key}")]
    FieldNotFound { key: String },
    #[error("field[{key}] expect value: {expected}, actual: {actual}")]
    FieldMismatch {
        key: String,
        expected: Value,
        actual: Value,
    },
    #[error("failed to compile expression '{expression}': {source}")]
    ExpressionCompile {
        expression: String,
        #[source]
        source: ExprError,
    },
    #[error("failed to evaluate expression '{expression}': {source}")]
    ExpressionEval {
        expression: String,
        #[source]
        source: ExprError,
    },
    #[error("failed to verify: {expression}")]
    VerificationFailed { expression: String },
}
