//! # nominis-search
//!
//! EUIPO trademark search core for Nominis.
//!
//! Fronts the EUIPO trademark-search API so a downstream client never
//! handles OAuth2 or the upstream's raw record shape.
//!
//! ## Design
//!
//! - [`token::TokenCache`] keeps one OAuth2 client-credentials token and
//!   reuses it until 30 seconds before expiry
//! - [`client::EuipoClient`] performs the authenticated search and passes
//!   upstream failures through with status and body intact
//! - [`normalize`] projects raw records into [`NormalizedRecord`] and applies
//!   the optional Nice class filter
//! - [`orchestrator`] retries once without diacritics when a query comes
//!   back empty
//!
//! ## Security
//!
//! - Client secrets are redacted from every `Debug` impl
//! - Query text is logged only at trace level

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod orchestrator;
pub mod source;
pub mod token;
pub mod types;

use std::sync::Arc;

pub use client::EuipoClient;
pub use config::EuipoConfig;
pub use error::{Result, SearchError, UpstreamFailure};
pub use orchestrator::search::SearchOptions;
pub use source::{TokenSource, TrademarkSource};
pub use token::{Clock, ManualClock, SystemClock, TokenCache};
pub use types::{Credential, NormalizedRecord, RawResponse, SearchQuery, SearchResult};

/// Token cache, search client and options wired together.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct TrademarkSearch {
    tokens: TokenCache,
    client: EuipoClient,
    options: SearchOptions,
}

impl TrademarkSearch {
    /// Build the service from `config` using the wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: EuipoConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build the service reading token expiry time from `clock`.
    ///
    /// # Errors
    ///
    /// Same as [`TrademarkSearch::new`].
    pub fn with_clock(config: EuipoConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let http = http::build_client(&config)?;
        let options = SearchOptions {
            status_filter: config.status_filter.clone(),
        };
        Ok(Self {
            tokens: TokenCache::with_clock(config.clone(), http.clone(), clock),
            client: EuipoClient::new(config, http),
            options,
        })
    }

    /// Search for `query`, retrying once without diacritics on an empty
    /// result.
    ///
    /// # Errors
    ///
    /// [`SearchError::AuthConfig`], [`SearchError::UpstreamAuth`] or
    /// [`SearchError::UpstreamSearch`], unchanged from the failing step.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> nominis_search::Result<()> {
    /// use nominis_search::{EuipoConfig, SearchQuery, TrademarkSearch};
    ///
    /// let config = EuipoConfig::default().with_credentials("client-id", "client-secret");
    /// let service = TrademarkSearch::new(config)?;
    /// let query = SearchQuery::new("Nuvilù")?.with_categories([9, 35])?;
    /// let result = service.search(&query).await?;
    /// for record in &result.records {
    ///     println!("{:?} {:?}", record.application_number, record.label);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        orchestrator::search::orchestrate_search(&self.tokens, &self.client, query, &self.options)
            .await
    }

    /// The token cache, for callers that need a bearer token directly.
    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }
}
