//! Error types for the Portana API access layer.

use thiserror::Error;

/// Result type alias for API access operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Maximum number of body characters kept in a status error.
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// Errors that can occur while talking to the Portana backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid backend configuration (e.g. no base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request did not complete within the client timeout
    #[error("Request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// Network level failure (connection refused, reset, DNS, ...)
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-2xx response from the backend. `body` holds the backend's own
    /// `detail`/`message`/`error` text when it sends one, otherwise a prefix
    /// of the raw body.
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// The response body did not carry the expected payload field
    #[error("Unexpected response envelope from {path}: {message}")]
    Envelope { path: String, message: String },

    /// The response body is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid request (empty subject id, unbuildable URL, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Credential store failure
    #[error("Credential store error: {0}")]
    Credentials(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a credential store error
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials(message.into())
    }

    /// Create a status error, keeping only a readable prefix of the body.
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect(),
        }
    }

    /// HTTP status code carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the backend rejected the credential (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
