//! Transport errors for remote proposal access

/// Failure talking to the remote host
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection or protocol failure
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded its timeout
    #[error("request timed out")]
    Timeout,

    /// Authentication failure or rate limiting (401/403)
    #[error("authentication or rate limit error (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Any other non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body could not be decoded
    #[error("malformed response: {0}")]
    Decode(String),

    /// No remote repository could be resolved
    #[error("no remote repository: {0}")]
    NoRepository(String),
}

impl TransportError {
    /// Create status error, classifying auth/rate-limit codes
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Unauthorized { status, message },
            _ => Self::Status { status, message },
        }
    }

    /// Check if a retry could plausibly succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Unauthorized { .. } | Self::Decode(_) | Self::NoRepository(_) => false,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
