//! Error types for the Herd client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Server statuses that indicate a transient failure worth retrying
pub const RETRYABLE_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Errors that can occur on a single HTTP exchange with the source API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request did not complete within its timeout
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Connection-level failure (refused, reset, DNS, ...)
    #[error("Connection error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The API answered with a status the caller does not accept
    #[error("Unexpected status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Anything not covered above
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ClientError {
    /// Create a status error
    pub fn status(status: u16) -> Self {
        Self::Status { status }
    }

    /// Returns the HTTP status code, if this error carries one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error is one of the retryable server statuses
    pub fn is_server_error(&self) -> bool {
        self.status_code()
            .is_some_and(|status| RETRYABLE_STATUSES.contains(&status))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_body() {
            Self::Transport(err)
        } else {
            Self::Unexpected(err.to_string())
        }
    }
}
