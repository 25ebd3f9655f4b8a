//! Seams between the orchestrator and the upstream.
//!
//! [`TokenSource`] yields bearer credentials and [`TrademarkSource`] runs a
//! raw search. Production uses [`TokenCache`](crate::token::TokenCache) and
//! [`EuipoClient`](crate::client::EuipoClient); tests substitute fakes.

use std::future::Future;

use crate::error::SearchError;
use crate::token::TokenCache;
use crate::types::{Credential, RawResponse};

/// Something that can hand out a valid bearer credential.
pub trait TokenSource: Send + Sync {
    /// Return a credential that is safe to use for one upstream call.
    ///
    /// # Errors
    ///
    /// [`SearchError::AuthConfig`] or [`SearchError::UpstreamAuth`].
    fn acquire(&self) -> impl Future<Output = Result<Credential, SearchError>> + Send;
}

impl TokenSource for TokenCache {
    fn acquire(&self) -> impl Future<Output = Result<Credential, SearchError>> + Send {
        TokenCache::acquire(self)
    }
}

/// A trademark search backend returning undecoded-record responses.
///
/// Implementations must pass upstream failures through unaltered.
pub trait TrademarkSource: Send + Sync {
    /// Run one authenticated search for `text` on the given page.
    ///
    /// # Errors
    ///
    /// [`SearchError::UpstreamSearch`] carrying the upstream status and body.
    fn fetch_raw(
        &self,
        token: &Credential,
        text: &str,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<RawResponse, SearchError>> + Send;
}
