//! EUIPO trademark search client.
//!
//! Sends `GET {api_base}/trademark-search/trademarks?text=…&page=…&size=…`
//! with a bearer token and the gateway client headers. Non-success
//! responses are returned as [`SearchError::UpstreamSearch`] with the
//! status and body untouched.

use std::fmt;

use crate::config::EuipoConfig;
use crate::error::{SearchError, UpstreamFailure};
use crate::source::TrademarkSource;
use crate::types::{Credential, RawResponse};

/// Gateway header carrying the client id.
pub const CLIENT_ID_HEADER: &str = "X-IBM-Client-Id";

/// Gateway header carrying the client secret.
pub const CLIENT_SECRET_HEADER: &str = "X-IBM-Client-Secret";

/// HTTP client for the EUIPO trademark search endpoint.
pub struct EuipoClient {
    config: EuipoConfig,
    client: reqwest::Client,
}

impl fmt::Debug for EuipoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EuipoClient")
            .field("search_url", &self.config.search_url())
            .field("send_secret_header", &self.config.send_secret_header)
            .finish()
    }
}

impl EuipoClient {
    /// Create a client sharing `client`'s connection pool and timeout.
    pub fn new(config: EuipoConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

impl TrademarkSource for EuipoClient {
    async fn fetch_raw(
        &self,
        token: &Credential,
        text: &str,
        page: u32,
        page_size: u32,
    ) -> Result<RawResponse, SearchError> {
        tracing::trace!(text, page, page_size, "querying trademark search");

        let page = page.to_string();
        let size = page_size.to_string();
        let mut request = self
            .client
            .get(self.config.search_url())
            .query(&[("text", text), ("page", page.as_str()), ("size", size.as_str())])
            .bearer_auth(&token.token)
            .header(CLIENT_ID_HEADER, &self.config.client_id);

        if self.config.send_secret_header {
            request = request.header(CLIENT_SECRET_HEADER, &self.config.client_secret);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SearchError::UpstreamSearch(UpstreamFailure::from_reqwest(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::UpstreamSearch(UpstreamFailure::from_reqwest(&e)))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "trademark search rejected");
            return Err(SearchError::UpstreamSearch(UpstreamFailure::Rejected {
                status: status.as_u16(),
                body,
            }));
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(RawResponse::new(value)),
            Err(_) => Err(SearchError::UpstreamSearch(UpstreamFailure::Malformed { body })),
        }
    }
}
