use thiserror::Error;

use super::{RequestBuildError, ResourceError, TemplateError, TransportError, VerifyError};

/// A failed test case run, tagged with the case name.
#[derive(Debug, Error)]
#[error("case '{case}': {kind}")]
pub struct CaseError {
    pub case: String,
    #[source]
    pub kind: Box<FailureKind>,
}

impl CaseError {
    pub fn new(case: impl Into<String>, kind: impl Into<FailureKind>) -> Self {
        Self {
            case: case.into(),
            kind: Box::new(kind.into()),
        }
    }

    /// Whether the run stopped because of a shutdown signal.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            *self.kind,
            FailureKind::Transport(TransportError::Cancelled { .. })
        )
    }
}

#[derive(Debug, Error)]
pub enum FailureKind {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("request build error: {0}")]
    RequestBuild(#[from] RequestBuildError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Verify(#[from] VerifyError),
    #[error("failed to prepare, error: {0}")]
    Prepare(#[source] ResourceError),
    #[error("failed to clean up, error: {source}{}", run_suffix(.run))]
    Cleanup {
        #[source]
        source: ResourceError,
        run: Option<Box<FailureKind>>,
    },
}

impl FailureKind {
    /// Short, stable name of the failure family.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            FailureKind::Template(_) => "template",
            FailureKind::RequestBuild(_) => "request-build",
            FailureKind::Transport(_) => "transport",
            FailureKind::Verify(VerifyError::Decode(_)) => "decode",
            FailureKind::Verify(VerifyError::StatusMismatch { .. }) => "status",
            FailureKind::Verify(VerifyError::HeaderMismatch { .. }) => "header",
            FailureKind::Verify(VerifyError::BodyMismatch { .. }) => "body",
            FailureKind::Verify(VerifyError::FieldNotFound { .. }) => "field-not-found",
            FailureKind::Verify(VerifyError::FieldMismatch { .. }) => "field-mismatch",
            FailureKind::Verify(VerifyError::ExpressionCompile { .. }) => "expression-compile",
            FailureKind::Verify(VerifyError::ExpressionEval { .. }) => "expression-eval",
            FailureKind::Verify(VerifyError::VerificationFailed { .. }) => "verification",
            FailureKind::Prepare(_) => "prepare",
            FailureKind::Cleanup { .. } => "cleanup",
        }
    }

    /// The failure of the run itself, ignoring any cleanup failure layered on top.
    #[must_use]
    pub fn run_failure(&self) -> Option<&FailureKind> {
        match self {
            FailureKind::Cleanup { run, .. } => run.as_deref(),
            FailureKind::Template(_)
            | FailureKind::RequestBuild(_)
            | FailureKind::Transport(_)
            | FailureKind::Verify(_)
            | FailureKind::Prepare(_) => Some(self),
        }
    }
}

fn run_suffix(run: &Option<Box<FailureKind>>) -> String {
    run.as_ref()
        .map_or_else(String::new, |run| format!(" (run also failed: {})", run))
}
