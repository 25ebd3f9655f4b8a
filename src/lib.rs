//! Nominis: trademark intelligence backend.
//!
//! Wraps the [`nominis_search`] core with the pieces a deployment needs:
//!
//! - **Config**: TOML file for endpoints, timeouts and filters
//! - **Credentials**: EUIPO client id and secret from the environment
//! - **Errors**: one error type with a JSON payload for downstream clients
//!
//! The `nominis` binary drives a single search or token check from the
//! command line and prints JSON to stdout.

pub mod config;
pub mod credentials;
pub mod error;

pub use config::NominisConfig;
pub use credentials::LoadedCredentials;
pub use error::{NominisError, Result};
pub use nominis_search::{SearchQuery, SearchResult, TrademarkSearch};

/// Build the search service from `config` and `credentials`.
///
/// Missing credentials are logged here but only fail once a token is
/// actually needed, as [`nominis_search::SearchError::AuthConfig`].
///
/// # Errors
///
/// Returns [`NominisError::Config`] or a search config error if `config`
/// is invalid.
pub fn build_service(
    config: &NominisConfig,
    credentials: &LoadedCredentials,
) -> Result<TrademarkSearch> {
    config.validate()?;
    if !credentials.is_complete() {
        tracing::warn!(missing = ?credentials.missing(), "EUIPO credentials not configured");
    }
    let service = TrademarkSearch::new(config.euipo_with(credentials))?;
    Ok(service)
}

/// Build a query from raw CLI/request inputs, applying config defaults.
///
/// # Errors
///
/// Returns the core's [`nominis_search::SearchError::InvalidQuery`] for
/// blank text, a zero class, or an out-of-range page size.
pub fn build_query(
    config: &NominisConfig,
    text: &str,
    classes: &[u32],
    page: u32,
    page_size: Option<u32>,
) -> Result<SearchQuery> {
    let query = SearchQuery::new(text)?
        .with_categories(classes.iter().copied())?
        .with_page(page)
        .with_page_size(page_size.unwrap_or(config.search.page_size))?;
    Ok(query)
}
