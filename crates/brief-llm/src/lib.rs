//! Model-call abstraction for the insider-brief pipeline
//!
//! This crate keeps the pipeline agnostic to which model service backs it:
//!
//! - Completion request/response types with a builder
//! - [`ModelProvider`] trait implemented by concrete clients
//! - [`ModelError`] taxonomy with a retryable/non-retryable split that the
//!   retry loop keys off
//! - A Groq chat-completions client (behind the `groq` feature)

pub mod completion;
pub mod error;
pub mod provider;

pub use completion::{
    CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage,
};
pub use error::{ModelError, Result};
pub use provider::ModelProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "groq")]
pub mod providers;
