use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tera::{Context, Tera};

use crate::error::{FailureKind, RequestBuildError, TemplateError};
use crate::json::kind_name;
use crate::suite::{Expect, Request};

const INLINE_TEMPLATE: &str = "__atest_inline";

/// Request with every template resolved against the data context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedRequest {
    pub method: String,
    pub api: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub form: BTreeMap<String, String>,
}

/// Renders templates against one data context.
#[derive(Debug, Clone)]
pub struct Renderer {
    context: Context,
}

impl Renderer {
    /// Builds a renderer over `data`. A `null` context renders templates with
    /// no variables in scope.
    ///
    /// # Errors
    ///
    /// Returns an error when `data` is neither null nor a mapping.
    pub fn new(data: &Value) -> Result<Self, TemplateError> {
        let context = match data {
            Value::Null => Context::new(),
            Value::Object(_) => Context::from_value(data.clone())
                .map_err(|source| TemplateError::Context {
                    source: Box::new(source),
                })?,
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                return Err(TemplateError::ContextNotMapping {
                    kind: kind_name(data),
                });
            }
        };
        Ok(Self { context })
    }

    /// Renders a single template. `field` names the template in errors.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid syntax or when rendering fails.
    pub fn render(&self, field: &str, template: &str) -> Result<String, TemplateError> {
        if !has_template_tags(template) {
            return Ok(template.to_owned());
        }
        let tera = compile(field, template)?;
        tera.render(INLINE_TEMPLATE, &self.context)
            .map_err(|source| TemplateError::Render {
                field: field.to_owned(),
                detail: TemplateError::describe(&source),
                source: Box::new(source),
            })
    }

    /// Renders the URL, method, headers, body and form of a request.
    ///
    /// An inline body wins over a file-sourced one; the file content is
    /// trimmed and used as the template source. An empty body is not rendered.
    ///
    /// # Errors
    ///
    /// Returns a template failure, or a request build failure when the body
    /// file cannot be read.
    pub fn render_request(&self, request: &Request) -> Result<RenderedRequest, FailureKind> {
        let api = self.render("api", &request.api)?;
        let method = self.render("method", &request.method)?;

        let body_source = match (request.body.is_empty(), request.body_from_file.as_deref()) {
            (true, Some(path)) => read_body_file(path)?,
            (true, None) | (false, _) => request.body.clone(),
        };
        let body = if body_source.is_empty() {
            body_source
        } else {
            self.render("body", &body_source)?
        };

        let headers = self.render_map("header", &request.header)?;
        let form = self.render_map("form", &request.form)?;

        Ok(RenderedRequest {
            method,
            api,
            headers,
            body,
            form,
        })
    }

    /// Renders the expected body and expected header values.
    ///
    /// # Errors
    ///
    /// Returns an error when any of those templates fails.
    pub fn render_expect(&self, expect: &Expect) -> Result<Expect, TemplateError> {
        let body = if expect.body.is_empty() {
            String::new()
        } else {
            self.render("expect.body", &expect.body)?
        };
        Ok(Expect {
            body,
            header: self.render_map("expect.header", &expect.header)?,
            ..expect.clone()
        })
    }

    fn render_map(
        &self,
        field: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, TemplateError> {
        values
            .iter()
            .map(|(key, value)| {
                let rendered = self.render(&format!("{field}[{key}]"), value)?;
                Ok((key.clone(), rendered))
            })
            .collect()
    }
}

/// Parses a template without rendering it.
///
/// # Errors
///
/// Returns an error when the template has invalid syntax.
pub fn check_syntax(field: &str, template: &str) -> Result<(), TemplateError> {
    if has_template_tags(template) {
        compile(field, template)?;
    }
    Ok(())
}

#[must_use]
pub fn has_template_tags(template: &str) -> bool {
    template.contains("{{") || template.contains("{%") || template.contains("{#")
}

fn compile(field: &str, template: &str) -> Result<Tera, TemplateError> {
    let mut tera = Tera::default();
    tera.add_raw_template(INLINE_TEMPLATE, template)
        .map_err(|source| TemplateError::Parse {
            field: field.to_owned(),
            detail: TemplateError::describe(&source),
            source: Box::new(source),
        })?;
    Ok(tera)
}

pub(crate) fn read_body_file(path: &Path) -> Result<String, RequestBuildError> {
    std::fs::read_to_string(path)
        .map(|content| content.trim().to_owned())
        .map_err(|source| RequestBuildError::ReadBodyFile {
            path: path.to_path_buf(),
            source,
        })
}
