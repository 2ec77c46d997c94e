//! Single-invocation agent runner
//!
//! One `run` call is exactly one model invocation: no retry, no
//! validation, no state. The retrying step owns all of that. The only
//! shortcuts are an empty record set, which resolves to a canned
//! "no activity" output without spending a model call, and a
//! `model_override` context entry, which routes the call to the fallback
//! model after a decommission.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::prompts::{self, PromptCatalog};
use crate::rate::RateBudget;
use brief_core::{AgentRole, AgentTask};
use brief_llm::{CompletionRequest, Message, ModelError, ModelProvider};
use std::sync::Arc;
use tracing::{debug, instrument};

const MAX_COMPLETION_TOKENS: usize = 2048;
const TEMPERATURE: f32 = 0.2;

/// Drives one model invocation per call
pub struct AgentRunner {
    provider: Arc<dyn ModelProvider>,
    catalog: PromptCatalog,
    rate: RateBudget,
    model: String,
}

impl AgentRunner {
    /// Create a runner over a provider
    ///
    /// # Errors
    ///
    /// Returns a template error if the prompt catalog fails to compile.
    pub fn new(provider: Arc<dyn ModelProvider>, config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            provider,
            catalog: PromptCatalog::new()?,
            rate: RateBudget::new(config.requests_per_minute),
            model: config.model.clone(),
        })
    }

    /// Run one model invocation for the task
    ///
    /// Waits on the shared rate budget before calling the provider. Model
    /// failures are returned as-is so the caller can classify them.
    #[instrument(skip(self, task), fields(task = %task.label(), attempt = task.attempt))]
    pub async fn run(&self, task: &AgentTask) -> std::result::Result<String, ModelError> {
        if task.records.is_empty() {
            debug!("Empty record set, returning canned output");
            return Ok(canned_output(task));
        }

        let model = task
            .context
            .model_override()
            .unwrap_or(&self.model)
            .to_string();

        let user = self
            .catalog
            .user_prompt(task)
            .map_err(|e| ModelError::Configuration(format!("prompt render failed: {e}")))?;

        self.rate.acquire().await;

        let request = CompletionRequest::builder(&model)
            .system(self.catalog.system_prompt(task.role))
            .messages(vec![Message::user(user)])
            .max_tokens(MAX_COMPLETION_TOKENS)
            .temperature(TEMPERATURE)
            .build();

        let response = self.provider.complete(request).await?;
        debug!(
            model = %model,
            output_chars = response.content.len(),
            tokens = response.usage.total(),
            "Model invocation completed"
        );
        Ok(response.content)
    }

    /// Provider name, for logs
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

fn canned_output(task: &AgentTask) -> String {
    match task.role {
        AgentRole::Summarizer => prompts::NO_FILINGS_OUTPUT.to_string(),
        AgentRole::Sentiment => {
            prompts::no_activity_sentiment(task.creator().unwrap_or("unknown"))
        }
    }
}
