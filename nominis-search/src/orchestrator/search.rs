//! Fallback orchestrator: Primary attempt, then at most one diacritic retry.
//!
//! ```text
//! ┌─────────┐ empty and text has marks ┌───────┐
//! │ Primary ├─────────────────────────►│ Retry ├──► Done
//! └────┬────┘                          └───────┘
//!      │ non-empty, or nothing to strip
//!      ▼
//!    Done
//! ```
//!
//! The retry fires on an empty result, never on an error. Token and
//! upstream errors propagate unchanged from whichever attempt raised them.

use std::collections::BTreeSet;

use crate::error::SearchError;
use crate::normalize::{normalize, retain_statuses};
use crate::source::{TokenSource, TrademarkSource};
use crate::types::{NormalizedRecord, SearchQuery, SearchResult};

use super::diacritics::stripped_variant;

/// Which attempt of the state machine is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// First call with the caller's text.
    Primary,
    /// The single follow-up call with diacritics stripped.
    Retry {
        /// The stripped text sent upstream.
        text: String,
    },
}

/// What to do after an attempt completes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Transition {
    Next(Attempt),
    Done,
}

/// Decide the next state. `Retry` is always terminal, which bounds the
/// machine to two upstream calls.
fn transition(attempt: &Attempt, query_text: &str, records: &[NormalizedRecord]) -> Transition {
    match attempt {
        Attempt::Primary if records.is_empty() => match stripped_variant(query_text) {
            Some(text) => Transition::Next(Attempt::Retry { text }),
            None => Transition::Done,
        },
        Attempt::Primary | Attempt::Retry { .. } => Transition::Done,
    }
}

/// Per-search options that do not belong to the query itself.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Keep only records whose status is listed. `None` keeps all.
    pub status_filter: Option<Vec<String>>,
}

/// Run `query` through the Primary → Retry state machine.
///
/// # Errors
///
/// Propagates [`SearchError::AuthConfig`], [`SearchError::UpstreamAuth`] and
/// [`SearchError::UpstreamSearch`] unchanged. No error is ever retried.
pub async fn orchestrate_search<T, S>(
    tokens: &T,
    source: &S,
    query: &SearchQuery,
    options: &SearchOptions,
) -> Result<SearchResult, SearchError>
where
    T: TokenSource,
    S: TrademarkSource,
{
    let mut attempt = Attempt::Primary;
    loop {
        let text = match &attempt {
            Attempt::Primary => query.text(),
            Attempt::Retry { text } => text.as_str(),
        };

        let records = run_attempt(tokens, source, query, text, options).await?;
        tracing::debug!(
            retry = matches!(attempt, Attempt::Retry { .. }),
            count = records.len(),
            "search attempt finished"
        );

        match transition(&attempt, query.text(), &records) {
            Transition::Next(next) => {
                tracing::info!("no results; retrying once without diacritics");
                attempt = next;
            }
            Transition::Done => {
                let effective_text = text.to_owned();
                return Ok(SearchResult {
                    query: query.text().to_owned(),
                    effective_text,
                    retried: matches!(attempt, Attempt::Retry { .. }),
                    page: query.page(),
                    page_size: query.page_size(),
                    records,
                });
            }
        }
    }
}

async fn run_attempt<T, S>(
    tokens: &T,
    source: &S,
    query: &SearchQuery,
    text: &str,
    options: &SearchOptions,
) -> Result<Vec<NormalizedRecord>, SearchError>
where
    T: TokenSource,
    S: TrademarkSource,
{
    let credential = tokens.acquire().await?;
    let raw = source
        .fetch_raw(&credential, text, query.page(), query.page_size())
        .await?;
    let filter: Option<&BTreeSet<u32>> = query.category_filter();
    let mut records = normalize(raw.trademarks(), filter);
    if let Some(allowed) = &options.status_filter {
        retain_statuses(&mut records, allowed);
    }
    Ok(records)
}
