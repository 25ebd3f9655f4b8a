//! Error types for the nominis application layer.

use nominis_search::SearchError;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum NominisError {
    /// Configuration file could not be parsed or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding of a result failed.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Token or search failure from the EUIPO core.
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl NominisError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_INVALID",
            Self::Io(_) => "IO_ERROR",
            Self::Encode(_) => "ENCODE_ERROR",
            Self::Search(e) => e.code(),
        }
    }

    /// JSON body describing this error for a downstream client.
    ///
    /// Upstream status and body are included verbatim when present so the
    /// caller can tell a deployment problem from an upstream rejection.
    pub fn to_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        if let Self::Search(e) = self {
            if let Some(status) = e.status() {
                payload["upstreamStatus"] = status.into();
            }
            if let Some(body) = e.body() {
                payload["upstreamBody"] = body.into();
            }
        }
        payload
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, NominisError>;
