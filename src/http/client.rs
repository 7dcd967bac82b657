use std::time::Duration;

use reqwest::Client;

use crate::error::AppResult;

const DEFAULT_USER_AGENT: &str = concat!("atest/", env!("CARGO_PKG_VERSION"));

/// Builds the shared HTTP client. `timeout` bounds each whole request,
/// body included.
///
/// # Errors
///
/// Returns an error when the TLS backend cannot be initialised.
pub fn build_client(timeout: Duration) -> AppResult<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .build()?;
    Ok(client)
}
