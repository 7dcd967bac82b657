use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestBuildError {
    #[error("Invalid HTTP method '{method}'.")]
    InvalidMethod { method: String },
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Invalid header name '{name}': {source}")]
    InvalidHeaderName {
        name: String,
        #[source]
        source: reqwest::header::InvalidHeaderName,
    },
    #[error("Invalid value for header '{name}': {source}")]
    InvalidHeaderValue {
        name: String,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },
    #[error("Failed to read body file '{path}': {source}")]
    ReadBodyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode form body: {source}")]
    EncodeForm {
        #[source]
        source: serde_urlencoded::ser::Error,
    },
    #[error("Failed to build request: {source}")]
    Build {
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request to {url} failed: {source}")]
    Send {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} timed out: {source}")]
    TimedOut {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body from {url}: {source}")]
    ReadBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} was cancelled.")]
    Cancelled { url: String },
}
