//! Shared HTTP client for upstream requests.
//!
//! One [`reqwest::Client`] is built per service and shared by the token
//! cache and the search client, so both observe the same timeout.

use std::time::Duration;

use crate::config::EuipoConfig;
use crate::error::SearchError;

/// Build a [`reqwest::Client`] for the EUIPO upstream.
///
/// The client has:
/// - Total request timeout from config (applies to auth and search)
/// - The configured User-Agent
/// - gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &EuipoConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}
