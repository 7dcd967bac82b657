use std::borrow::Cow;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::HeaderMap;
use reqwest::{Client, Request};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tracing::debug;

use crate::error::TransportError;
use crate::shutdown::ShutdownReceiver;

/// Status, headers and fully read body of one response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub elapsed: Duration,
}

impl RawResponse {
    /// First value of `key`, or an empty string when absent or not text.
    #[must_use]
    pub fn header(&self, key: &str) -> &str {
        self.headers
            .get(key)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Sends `request` and reads the whole body, giving up early when a shutdown
/// signal arrives. A non-2xx status is not an error here.
///
/// # Errors
///
/// Returns an error on network failure, timeout or cancellation.
pub async fn execute(
    client: &Client,
    request: Request,
    shutdown_rx: &mut ShutdownReceiver,
) -> Result<RawResponse, TransportError> {
    let url = request.url().to_string();
    tokio::select! {
        () = wait_for_shutdown(shutdown_rx) => Err(TransportError::Cancelled { url: url.clone() }),
        result = send_and_read(client, request, &url) => result,
    }
}

async fn wait_for_shutdown(shutdown_rx: &mut ShutdownReceiver) {
    match shutdown_rx.recv().await {
        Ok(()) | Err(RecvError::Lagged(_)) => {}
        Err(RecvError::Closed) => std::future::pending::<()>().await,
    }
}

async fn send_and_read(
    client: &Client,
    request: Request,
    url: &str,
) -> Result<RawResponse, TransportError> {
    let start = Instant::now();
    let response = client.execute(request).await.map_err(|err| {
        if err.is_timeout() {
            TransportError::TimedOut {
                url: url.to_owned(),
                source: err,
            }
        } else {
            TransportError::Send {
                url: url.to_owned(),
                source: err,
            }
        }
    })?;

    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|err| {
            if err.is_timeout() {
                TransportError::TimedOut {
                    url: url.to_owned(),
                    source: err,
                }
            } else {
                TransportError::ReadBody {
                    url: url.to_owned(),
                    source: err,
                }
            }
        })?;
        body.extend_from_slice(&chunk);
    }

    let elapsed = start.elapsed();
    debug!(
        "{} responded {} with {} byte(s) in {:?}",
        url,
        status,
        body.len(),
        elapsed
    );
    Ok(RawResponse {
        status,
        headers,
        body,
        elapsed,
    })
}
