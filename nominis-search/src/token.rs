//! OAuth2 client-credentials token cache.
//!
//! Holds at most one [`Credential`]. [`TokenCache::acquire`] hands out the
//! cached credential while it has more than the configured margin of
//! validity left, and otherwise performs a token exchange and overwrites
//! the cache.
//!
//! The cache lock is held across the exchange, so callers that find the
//! cache empty or stale at the same moment share a single refresh.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::Mutex;

use crate::config::EuipoConfig;
use crate::error::{SearchError, UpstreamFailure};
use crate::types::Credential;

/// Time source for expiry checks.
pub trait Clock: Send + Sync {
    /// Returns the current Unix timestamp in seconds.
    fn now_secs(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs()
    }
}

/// Settable clock for deterministic expiry tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a clock frozen at `now` (Unix seconds).
    pub fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Move forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Single-slot cache for the upstream bearer token.
pub struct TokenCache {
    config: EuipoConfig,
    client: reqwest::Client,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<Credential>>,
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("auth_url", &self.config.auth_url)
            .field("refresh_margin_seconds", &self.config.refresh_margin_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenCache {
    /// Create an empty cache using the wall clock.
    pub fn new(config: EuipoConfig, client: reqwest::Client) -> Self {
        Self::with_clock(config, client, Arc::new(SystemClock))
    }

    /// Create an empty cache reading time from `clock`.
    pub fn with_clock(config: EuipoConfig, client: reqwest::Client, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            client,
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Return a credential with more than the refresh margin of validity
    /// left, exchanging for a new one if needed.
    ///
    /// # Errors
    ///
    /// - [`SearchError::AuthConfig`] if the client id or secret is empty.
    ///   No request is made.
    /// - [`SearchError::UpstreamAuth`] if the exchange is rejected, times
    ///   out, or returns no `access_token`.
    pub async fn acquire(&self) -> Result<Credential, SearchError> {
        if !self.config.has_credentials() {
            return Err(SearchError::AuthConfig(
                "missing EUIPO_CLIENT_ID / EUIPO_CLIENT_SECRET".into(),
            ));
        }

        let mut slot = self.slot.lock().await;
        let now = self.clock.now_secs();
        if let Some(cred) = slot.as_ref() {
            if cred.is_fresh(now, self.config.refresh_margin_seconds) {
                tracing::trace!(expires_at = cred.expires_at, "token cache hit");
                return Ok(cred.clone());
            }
            tracing::debug!(expires_at = cred.expires_at, now, "cached token near expiry");
        }

        let fresh = self.exchange().await?;
        tracing::debug!(expires_at = fresh.expires_at, "obtained new access token");
        *slot = Some(fresh.clone());
        Ok(fresh)
    }

    /// Drop the cached credential. The next [`acquire`](Self::acquire)
    /// performs an exchange.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }

    /// The currently cached credential, fresh or not.
    pub async fn cached(&self) -> Option<Credential> {
        self.slot.lock().await.clone()
    }

    async fn exchange(&self) -> Result<Credential, SearchError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", "uid"),
        ];

        let response = self
            .client
            .post(&self.config.auth_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| SearchError::UpstreamAuth(UpstreamFailure::from_reqwest(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::UpstreamAuth(UpstreamFailure::from_reqwest(&e)))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "token endpoint rejected exchange");
            return Err(SearchError::UpstreamAuth(UpstreamFailure::Rejected {
                status: status.as_u16(),
                body,
            }));
        }

        let parsed: serde_json::Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(_) => return Err(SearchError::UpstreamAuth(UpstreamFailure::Malformed { body })),
        };

        let token = match parsed.get("access_token").and_then(serde_json::Value::as_str) {
            Some(t) if !t.is_empty() => t.to_owned(),
            _ => return Err(SearchError::UpstreamAuth(UpstreamFailure::Malformed { body })),
        };

        let expires_in = parse_expires_in(parsed.get("expires_in"))
            .unwrap_or(self.config.default_expires_in);

        Ok(Credential {
            token,
            expires_at: self.clock.now_secs().saturating_add(expires_in),
        })
    }
}

/// `expires_in` as whole seconds. Some gateways send it as a string or a
/// float; fractional seconds are truncated.
fn parse_expires_in(value: Option<&serde_json::Value>) -> Option<u64> {
    match value? {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_secs)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse().ok().or_else(|| s.parse::<f64>().ok().and_then(whole_secs))
        }
        _ => None,
    }
}

fn whole_secs(secs: f64) -> Option<u64> {
    (secs.is_finite() && secs >= 0.0).then(|| secs.trunc() as u64)
}
