//! Error types for the nominis-search crate.
//!
//! Upstream failures keep the upstream status and body verbatim so callers
//! can tell a misconfigured deployment from a rejected query from an
//! unavailable upstream. Secrets never appear in error messages.

use std::fmt;

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// Client id or client secret is missing.
    pub const AUTH_CONFIG: &str = "AUTH_CONFIG";

    /// The authentication upstream rejected the exchange, timed out, or
    /// returned something unusable.
    pub const UPSTREAM_AUTH: &str = "UPSTREAM_AUTH";

    /// The search upstream rejected the query or was unreachable.
    pub const UPSTREAM_SEARCH: &str = "UPSTREAM_SEARCH";

    /// The search query failed validation.
    pub const INVALID_QUERY: &str = "INVALID_QUERY";

    /// Invalid configuration (URLs, timeouts).
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// The HTTP client could not be constructed.
    pub const HTTP_CLIENT: &str = "HTTP_CLIENT";
}

/// How an upstream call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    /// Upstream answered with a non-success status. Body is kept verbatim.
    Rejected {
        /// HTTP status code returned by the upstream.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// Upstream answered 2xx but the body could not be used.
    Malformed {
        /// Raw response body.
        body: String,
    },
    /// The request exceeded the configured timeout.
    Timeout,
    /// Connection-level failure (DNS, TLS, reset).
    Transport(String),
}

impl UpstreamFailure {
    /// Map a reqwest send/read error to a failure variant.
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { status, body } => write!(f, "status {status}: {body}"),
            Self::Malformed { body } => write!(f, "malformed response: {body}"),
            Self::Timeout => f.write_str("request timed out"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

/// Errors that can occur while acquiring a token or searching.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Required secrets are missing. No network call was attempted.
    #[error("[{}] {}", error_codes::AUTH_CONFIG, .0)]
    AuthConfig(String),

    /// Token exchange with the authentication upstream failed.
    #[error("[{}] token exchange failed: {}", error_codes::UPSTREAM_AUTH, .0)]
    UpstreamAuth(UpstreamFailure),

    /// The search upstream failed.
    #[error("[{}] search request failed: {}", error_codes::UPSTREAM_SEARCH, .0)]
    UpstreamSearch(UpstreamFailure),

    /// Query text, paging or class filter out of range.
    #[error("[{}] {}", error_codes::INVALID_QUERY, .0)]
    InvalidQuery(String),

    /// Invalid configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Config(String),

    /// Failed to build the HTTP client.
    #[error("[{}] {}", error_codes::HTTP_CLIENT, .0)]
    Http(String),
}

impl SearchError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthConfig(_) => error_codes::AUTH_CONFIG,
            Self::UpstreamAuth(_) => error_codes::UPSTREAM_AUTH,
            Self::UpstreamSearch(_) => error_codes::UPSTREAM_SEARCH,
            Self::InvalidQuery(_) => error_codes::INVALID_QUERY,
            Self::Config(_) => error_codes::CONFIG_INVALID,
            Self::Http(_) => error_codes::HTTP_CLIENT,
        }
    }

    /// Upstream failure details, if this error came from an upstream call.
    pub fn upstream(&self) -> Option<&UpstreamFailure> {
        match self {
            Self::UpstreamAuth(f) | Self::UpstreamSearch(f) => Some(f),
            _ => None,
        }
    }

    /// Upstream HTTP status, when the upstream answered with one.
    pub fn status(&self) -> Option<u16> {
        match self.upstream()? {
            UpstreamFailure::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Upstream response body, verbatim, when one was received.
    pub fn body(&self) -> Option<&str> {
        match self.upstream()? {
            UpstreamFailure::Rejected { body, .. } | UpstreamFailure::Malformed { body } => {
                Some(body)
            }
            _ => None,
        }
    }
}

/// Convenience type alias for nominis-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(SearchError::AuthConfig("x".into()).code(), "AUTH_CONFIG");
        assert_eq!(
            SearchError::UpstreamAuth(UpstreamFailure::Timeout).code(),
            "UPSTREAM_AUTH"
        );
        assert_eq!(
            SearchError::UpstreamSearch(UpstreamFailure::Timeout).code(),
            "UPSTREAM_SEARCH"
        );
        assert_eq!(SearchError::InvalidQuery("x".into()).code(), "INVALID_QUERY");
        assert_eq!(SearchError::Config("x".into()).code(), "CONFIG_INVALID");
        assert_eq!(SearchError::Http("x".into()).code(), "HTTP_CLIENT");
    }

    #[test]
    fn rejected_keeps_status_and_body() {
        let err = SearchError::UpstreamSearch(UpstreamFailure::Rejected {
            status: 429,
            body: r#"{"error":"rate limited"}"#.into(),
        });
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.body(), Some(r#"{"error":"rate limited"}"#));
        assert_eq!(
            err.to_string(),
            r#"[UPSTREAM_SEARCH] search request failed: status 429: {"error":"rate limited"}"#
        );
    }

    #[test]
    fn malformed_has_body_but_no_status() {
        let err = SearchError::UpstreamAuth(UpstreamFailure::Malformed {
            body: "{}".into(),
        });
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), Some("{}"));
    }

    #[test]
    fn timeout_has_neither() {
        let err = SearchError::UpstreamAuth(UpstreamFailure::Timeout);
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn config_errors_are_not_upstream() {
        let err = SearchError::AuthConfig("missing EUIPO_CLIENT_ID".into());
        assert!(err.upstream().is_none());
        assert_eq!(err.to_string(), "[AUTH_CONFIG] missing EUIPO_CLIENT_ID");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
