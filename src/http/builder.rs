use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Request, Url};

use crate::error::RequestBuildError;
use crate::template::RenderedRequest;

pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

enum BodyPlan {
    Empty,
    Raw(String),
    UrlEncoded(String),
    Multipart(Form),
}

/// Builds a transport-ready request from a rendered one.
///
/// Body precedence is inline/file body, then form fields, then nothing. Form
/// fields are only sent when the declared `Content-Type` is multipart or
/// urlencoded; a multipart body replaces the declared content type with one
/// carrying the boundary.
///
/// # Errors
///
/// Returns an error for an invalid method, URL or header, or when the form
/// cannot be encoded.
pub fn build_request(client: &Client, rendered: &RenderedRequest) -> Result<Request, RequestBuildError> {
    let method = Method::from_bytes(rendered.method.trim().to_ascii_uppercase().as_bytes())
        .ok()
        .ok_or_else(|| RequestBuildError::InvalidMethod {
            method: rendered.method.clone(),
        })?;
    let url = Url::parse(&rendered.api).map_err(|err| RequestBuildError::InvalidUrl {
        url: rendered.api.clone(),
        source: err,
    })?;
    let mut headers = header_map(rendered)?;

    let mut request_builder = client.request(method, url);
    match body_plan(rendered)? {
        BodyPlan::Empty => {}
        BodyPlan::Raw(body) | BodyPlan::UrlEncoded(body) => {
            request_builder = request_builder.body(body);
        }
        BodyPlan::Multipart(form) => {
            let content_type = format!("{}; boundary={}", MULTIPART_FORM_DATA, form.boundary());
            let value = HeaderValue::from_str(&content_type).map_err(|err| {
                RequestBuildError::InvalidHeaderValue {
                    name: CONTENT_TYPE.as_str().to_owned(),
                    source: err,
                }
            })?;
            headers.insert(CONTENT_TYPE, value);
            request_builder = request_builder.multipart(form);
        }
    }

    request_builder
        .headers(headers)
        .build()
        .map_err(|err| RequestBuildError::Build { source: err })
}

fn body_plan(rendered: &RenderedRequest) -> Result<BodyPlan, RequestBuildError> {
    if !rendered.body.is_empty() {
        return Ok(BodyPlan::Raw(rendered.body.clone()));
    }
    if rendered.form.is_empty() {
        return Ok(BodyPlan::Empty);
    }

    let essence = declared_content_type(rendered)
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase());
    match essence.as_deref() {
        Some(MULTIPART_FORM_DATA) => {
            let form = rendered
                .form
                .iter()
                .fold(Form::new(), |form, (name, value)| {
                    form.text(name.clone(), value.clone())
                });
            Ok(BodyPlan::Multipart(form))
        }
        Some(FORM_URLENCODED) => serde_urlencoded::to_string(&rendered.form)
            .map(BodyPlan::UrlEncoded)
            .map_err(|err| RequestBuildError::EncodeForm { source: err }),
        Some(_) | None => Ok(BodyPlan::Empty),
    }
}

fn declared_content_type(rendered: &RenderedRequest) -> Option<&str> {
    rendered
        .headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(CONTENT_TYPE.as_str()))
        .map(|(_, value)| value.as_str())
}

fn header_map(rendered: &RenderedRequest) -> Result<HeaderMap, RequestBuildError> {
    let mut headers = HeaderMap::with_capacity(rendered.headers.len());
    for (key, value) in &rendered.headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
            RequestBuildError::InvalidHeaderName {
                name: key.clone(),
                source: err,
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|err| {
            RequestBuildError::InvalidHeaderValue {
                name: key.clone(),
                source: err,
            }
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}
