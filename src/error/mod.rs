mod app;
mod case;
mod config;
mod expr;
mod http;
mod report;
mod resource;
mod template;
mod validation;
mod verify;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use case::{CaseError, FailureKind};
pub use config::ConfigError;
pub use expr::ExprError;
pub use http::{RequestBuildError, TransportError};
pub use report::ReportError;
pub use resource::ResourceError;
pub use template::TemplateError;
pub use validation::ValidationError;
pub use verify::{DecodeError, VerifyError};
