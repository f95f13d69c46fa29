//! Error types for the Postmark transport.

use core_config::ConfigError;
use thiserror::Error;

/// Result type for Postmark operations.
pub type PostmarkResult<T> = Result<T, PostmarkError>;

/// Errors that can occur while building or sending a message.
#[derive(Debug, Error)]
pub enum PostmarkError {
    /// Missing or invalid configuration (e.g. no server token).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The message is not sendable, or Postmark rejected it (HTTP 422).
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTP 401.
    #[error("Postmark authentication failed: missing or incorrect API key")]
    Auth,

    /// HTTP 500.
    #[error("Postmark internal server error")]
    Server,

    /// HTTP 503.
    #[error("Postmark is unavailable (planned outage)")]
    Unavailable,

    /// Any other non-success status.
    #[error("Postmark API error (status {status}, code {code}): {message}")]
    UnknownApi {
        status: u16,
        code: i64,
        message: String,
    },

    /// A success status whose body is not the expected JSON object.
    #[error("Unexpected response shape from Postmark: {0}")]
    Protocol(String),

    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Payload serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PostmarkError {
    /// Whether a caller-side retry of the same message could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Server | Self::Unavailable | Self::Transport(_))
    }

    /// Stable name of the variant. Carries none of the message text, which
    /// may quote addresses or API messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::Auth => "auth",
            Self::Server => "server",
            Self::Unavailable => "unavailable",
            Self::UnknownApi { .. } => "unknown_api",
            Self::Protocol(_) => "protocol",
            Self::Transport(_) => "transport",
            Self::Serialization(_) => "serialization",
        }
    }
}

impl From<ConfigError> for PostmarkError {
    fn from(err: ConfigError) -> Self {
        PostmarkError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for PostmarkError {
    fn from(err: reqwest::Error) -> Self {
        PostmarkError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for PostmarkError {
    fn from(err: serde_json::Error) -> Self {
        PostmarkError::Serialization(err.to_string())
    }
}
