//! Error types for model operations

use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur during a model invocation
///
/// The retry loop treats rate limits, transient transport failures, server
/// errors, and decommissioned models as retryable; authentication and
/// request-shape problems are terminal.
#[derive(Error, Debug)]
pub enum ModelError {
    /// API request failed with an unclassified status
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model decommissioned or unknown to the provider
    #[error("Model decommissioned or unknown: {0}")]
    ModelDecommissioned(String),

    /// Upstream service error (5xx)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP transport error
    #[cfg(feature = "groq")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ModelError {
    /// Whether a retry with backoff could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited(_) | Self::ServiceUnavailable(_) | Self::ModelDecommissioned(_) => {
                true
            }
            #[cfg(feature = "groq")]
            Self::HttpError(e) => e.is_timeout() || e.is_connect(),
            Self::RequestFailed(_)
            | Self::AuthenticationFailed
            | Self::InvalidRequest(_)
            | Self::SerializationError(_)
            | Self::UnexpectedResponse(_)
            | Self::Configuration(_) => false,
        }
    }

    /// Whether the failure should switch subsequent attempts to the
    /// configured fallback model
    pub fn wants_fallback(&self) -> bool {
        matches!(self, Self::ModelDecommissioned(_))
    }
}
