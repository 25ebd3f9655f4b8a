//! Core types: credentials, queries, raw upstream records and normalised results.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Smallest page size the upstream accepts.
pub const MIN_PAGE_SIZE: u32 = 10;

/// Largest page size the proxy forwards.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A bearer token plus its absolute expiry (Unix seconds).
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Opaque bearer token.
    pub token: String,
    /// Absolute expiry, seconds since the Unix epoch.
    pub expires_at: u64,
}

impl Credential {
    /// Whether this credential may still be handed out at `now`, keeping
    /// `margin_secs` of validity in reserve.
    pub fn is_fresh(&self, now: u64, margin_secs: u64) -> bool {
        now < self.expires_at.saturating_sub(margin_secs)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A validated trademark search request.
///
/// Construct with [`SearchQuery::new`] and the `with_*` builders; every
/// builder re-validates so an invalid query can never reach the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    text: String,
    category_filter: Option<BTreeSet<u32>>,
    page: u32,
    page_size: u32,
}

impl SearchQuery {
    /// Create a query for `text` with page 0 and the minimum page size.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] if `text` is blank.
    pub fn new(text: impl Into<String>) -> Result<Self, SearchError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SearchError::InvalidQuery("text must not be empty".into()));
        }
        Ok(Self {
            text,
            category_filter: None,
            page: 0,
            page_size: MIN_PAGE_SIZE,
        })
    }

    /// Restrict results to records sharing at least one of `classes`.
    /// An empty iterator clears the filter.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] if any class is zero.
    pub fn with_categories(
        mut self,
        classes: impl IntoIterator<Item = u32>,
    ) -> Result<Self, SearchError> {
        let set: BTreeSet<u32> = classes.into_iter().collect();
        if set.contains(&0) {
            return Err(SearchError::InvalidQuery(
                "category codes must be positive".into(),
            ));
        }
        self.category_filter = if set.is_empty() { None } else { Some(set) };
        Ok(self)
    }

    /// Set the zero-based page index.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] unless
    /// `MIN_PAGE_SIZE <= size <= MAX_PAGE_SIZE`.
    pub fn with_page_size(mut self, size: u32) -> Result<Self, SearchError> {
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&size) {
            return Err(SearchError::InvalidQuery(format!(
                "page size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}, got {size}"
            )));
        }
        self.page_size = size;
        Ok(self)
    }

    /// The query text as supplied by the caller.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The category filter, if any.
    pub fn category_filter(&self) -> Option<&BTreeSet<u32>> {
        self.category_filter.as_ref()
    }

    /// Zero-based page index.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// A record exactly as the upstream returned it.
pub type RawRecord = serde_json::Value;

/// Decoded upstream search response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    body: serde_json::Value,
}

impl RawResponse {
    /// Wrap a decoded response body.
    pub fn new(body: serde_json::Value) -> Self {
        Self { body }
    }

    /// The `trademarks` list. Missing or non-list yields an empty slice.
    pub fn trademarks(&self) -> &[RawRecord] {
        self.body
            .get("trademarks")
            .and_then(serde_json::Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The full decoded body.
    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }
}

/// Stable projection of a [`RawRecord`].
///
/// Fields the upstream did not supply are `None` and serialise as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    pub application_number: Option<String>,
    /// Best-effort display text for the mark.
    pub label: Option<String>,
    pub status: Option<String>,
    /// Nice classes, in upstream order.
    pub categories: Vec<u32>,
    pub mark_feature: Option<String>,
    pub application_date: Option<String>,
    pub registration_date: Option<String>,
}

/// The answer to one [`SearchQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Query text as the caller supplied it.
    pub query: String,
    /// Text actually sent upstream for the returned records.
    pub effective_text: String,
    /// Whether the diacritic-stripped retry produced this result.
    pub retried: bool,
    pub page: u32,
    pub page_size: u32,
    pub records: Vec<NormalizedRecord>,
}
