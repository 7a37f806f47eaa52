//! Error types for the player gateway

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors a single gateway call can end with.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced a response (refused, unreachable, reset).
    #[error("request to {endpoint} failed: {reason}")]
    Network { endpoint: String, reason: String },

    /// The body was not JSON, or not the JSON shape we expect.
    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// The player answered with a non-success status (bad password, unknown
    /// command, ...).
    #[error("player rejected request with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl GatewayError {
    pub fn network(endpoint: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// Short label for toasts and log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Parse(_) => "parse",
            Self::Rejected { .. } => "rejected",
        }
    }
}
