//! Error types for pipeline construction and helpers
//!
//! The orchestrator's `run` itself never returns an error; it degrades
//! into the report instead. These variants surface problems found while
//! building the pipeline (bad configuration, broken prompt templates).

use thiserror::Error;

/// Pipeline construction and helper errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Prompt template failed to compile or render
    #[error("Template error: {0}")]
    TemplateError(String),

    /// A data source could not be constructed or queried
    #[error("Fetch error: {0}")]
    FetchError(#[from] brief_core::FetchError),

    /// Model invocation failed
    #[error("Model error: {0}")]
    ModelError(#[from] brief_llm::ModelError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<minijinja::Error> for PipelineError {
    fn from(err: minijinja::Error) -> Self {
        Self::TemplateError(err.to_string())
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::ConfigError("max_attempts must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: max_attempts must be at least 1"
        );
    }

    #[test]
    fn test_fetch_error_conversion() {
        let fetch = brief_core::FetchError::Http("503".to_string());
        let err: PipelineError = fetch.into();
        assert!(matches!(err, PipelineError::FetchError(_)));
    }
}
