//! Fetch-side error type

use thiserror::Error;

/// Error from a data-source adapter
///
/// Category-scoped and non-fatal: the orchestrator logs it, treats the
/// category as empty, and records a degradation note in the report.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP transport or status failure
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Upstream payload could not be parsed
    #[error("Failed to parse source data: {0}")]
    Parse(String),

    /// Local I/O failure (dataset file missing, unreadable)
    #[error("I/O error reading source: {0}")]
    Io(#[from] std::io::Error),

    /// A required credential or identification header is not configured
    #[error("Missing credential: {0}")]
    MissingCredential(String),
}
