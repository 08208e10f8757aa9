// Error types for the API client. The library never prints or retries;
// every failure is surfaced to the caller as one of these kinds.

use thiserror::Error;

/// Result type for API client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by `PortainerClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, DNS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Login succeeded at the HTTP level but the response carried no token.
    #[error("not authenticated: login response did not contain a jwt")]
    NotAuthenticated,

    /// A 2xx JSON response was missing a field we require.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::NotAuthenticated)
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
