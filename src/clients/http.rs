//! Shared HTTP client construction policy.
//!
//! Centralizes networking defaults so the search clients and the resolution
//! probe stay consistent on timeout, user-agent, and compression.

use std::time::Duration;

use reqwest::Client;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Builds the shared project user-agent string.
#[must_use]
pub fn default_user_agent() -> String {
    format!(
        "citelink/{} (publication-dataset linking; research-tool)",
        env!("CARGO_PKG_VERSION")
    )
}

/// Builds an API client using shared project policy.
///
/// # Errors
///
/// Returns the underlying [`reqwest::Error`] when construction fails.
pub fn build_api_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .user_agent(default_user_agent())
        .gzip(true)
        .build()
}

/// Builds the DOI resolution probe client.
///
/// Redirect following is disabled: the probe classifies resolvability from
/// the literal response status, so a followed redirect would mask it.
///
/// # Errors
///
/// Returns the underlying [`reqwest::Error`] when construction fails.
pub fn build_probe_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .user_agent(default_user_agent())
        .redirect(reqwest::redirect::Policy::none())
        .build()
}
