//! Model provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for model providers
///
/// Implementations give the pipeline access to a chat-completion service.
/// The orchestration layer only depends on this trait, so providers can be
/// swapped (or mocked in tests) without touching the control logic.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Generate a completion
    ///
    /// # Arguments
    ///
    /// * `request` - The completion request with messages and parameters
    ///
    /// # Returns
    ///
    /// The completion response with the assistant text and metadata
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "groq")
    fn name(&self) -> &str;
}
