use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Invalid {field} template: {detail}")]
    Parse {
        field: String,
        detail: String,
        #[source]
        source: Box<tera::Error>,
    },
    #[error("Failed to render {field} template: {detail}")]
    Render {
        field: String,
        detail: String,
        #[source]
        source: Box<tera::Error>,
    },
    #[error("Template context must be a mapping, got {kind}.")]
    ContextNotMapping { kind: &'static str },
    #[error("Failed to load template context: {source}")]
    Context {
        #[source]
        source: Box<tera::Error>,
    },
}

impl TemplateError {
    /// Flattens the tera error chain so the root cause shows up in the message.
    pub(crate) fn describe(error: &tera::Error) -> String {
        let mut parts = vec![error.to_string()];
        let mut current = std::error::Error::source(error);
        while let Some(cause) = current {
            parts.push(cause.to_string());
            current = cause.source();
        }
        parts.join(": ")
    }
}
