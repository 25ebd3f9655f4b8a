//! Upstream configuration with sandbox defaults.
//!
//! [`EuipoConfig`] holds the endpoints, secrets and timing knobs used by the
//! token cache and the search client. Secrets are redacted from `Debug`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Default OAuth2 token endpoint (EUIPO sandbox).
pub const DEFAULT_AUTH_URL: &str = "https://auth-sandbox.euipo.europa.eu/oidc/accessToken";

/// Default trademark API base (EUIPO sandbox).
pub const DEFAULT_API_BASE: &str = "https://api-sandbox.euipo.europa.eu";

/// Statuses kept by the optional status filter when enabled via
/// [`EuipoConfig::with_live_status_filter`].
pub const LIVE_STATUSES: &[&str] = &["REGISTERED", "APPLICATION_UNDER_EXAMINATION", "OPPOSITION"];

/// Configuration for talking to the EUIPO upstream.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EuipoConfig {
    /// OAuth2 client-credentials token endpoint.
    pub auth_url: String,
    /// Base URL of the trademark API. The search path is appended.
    pub api_base: String,
    /// OAuth2 client id. Also sent as the gateway client-id header.
    #[serde(skip)]
    pub client_id: String,
    /// OAuth2 client secret.
    #[serde(skip)]
    pub client_secret: String,
    /// Per-request timeout in seconds, for both auth and search calls.
    pub timeout_seconds: u64,
    /// A cached token is only reused while it has at least this many
    /// seconds left.
    pub refresh_margin_seconds: u64,
    /// Token lifetime assumed when the upstream omits `expires_in`.
    pub default_expires_in: u64,
    /// Also send the client secret as a gateway header on search calls.
    pub send_secret_header: bool,
    /// Keep only records whose status is in this list. `None` keeps all.
    pub status_filter: Option<Vec<String>>,
    /// User-Agent sent on upstream calls.
    pub user_agent: String,
}

impl Default for EuipoConfig {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_owned(),
            api_base: DEFAULT_API_BASE.to_owned(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_seconds: 30,
            refresh_margin_seconds: 30,
            default_expires_in: 3600,
            send_secret_header: true,
            status_filter: None,
            user_agent: concat!("nominis-search/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl fmt::Debug for EuipoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EuipoConfig")
            .field("auth_url", &self.auth_url)
            .field("api_base", &self.api_base)
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("refresh_margin_seconds", &self.refresh_margin_seconds)
            .field("default_expires_in", &self.default_expires_in)
            .field("send_secret_header", &self.send_secret_header)
            .field("status_filter", &self.status_filter)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn redact(s: &str) -> &str {
    if s.is_empty() { "" } else { "[REDACTED]" }
}

impl EuipoConfig {
    /// Set the client credentials. Surrounding whitespace is trimmed.
    pub fn with_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = client_id.into().trim().to_owned();
        self.client_secret = client_secret.into().trim().to_owned();
        self
    }

    /// Point both endpoints at a single base URL (`{base}/oidc/accessToken`
    /// and `{base}` respectively). Used for local mocks.
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.auth_url = format!("{base}/oidc/accessToken");
        self.api_base = base.to_owned();
        self
    }

    /// Enable the status filter with [`LIVE_STATUSES`].
    pub fn with_live_status_filter(mut self) -> Self {
        self.status_filter = Some(LIVE_STATUSES.iter().map(|s| (*s).to_owned()).collect());
        self
    }

    /// Whether both secrets are present.
    pub fn has_credentials(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }

    /// Full URL of the trademark search endpoint.
    pub fn search_url(&self) -> String {
        format!(
            "{}/trademark-search/trademarks",
            self.api_base.trim_end_matches('/')
        )
    }

    /// Validates this configuration.
    ///
    /// Secrets are not checked here: a missing secret is reported as
    /// [`SearchError::AuthConfig`] when a token is first needed.
    pub fn validate(&self) -> Result<(), SearchError> {
        for (name, value) in [("auth_url", &self.auth_url), ("api_base", &self.api_base)] {
            let parsed = url::Url::parse(value)
                .map_err(|e| SearchError::Config(format!("{name} is not a valid URL: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(SearchError::Config(format!(
                    "{name} must use http or https"
                )));
            }
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.refresh_margin_seconds >= self.default_expires_in {
            return Err(SearchError::Config(
                "refresh_margin_seconds must be less than default_expires_in".into(),
            ));
        }
        if matches!(&self.status_filter, Some(list) if list.is_empty()) {
            return Err(SearchError::Config(
                "status_filter must not be an empty list".into(),
            ));
        }
        Ok(())
    }
}
