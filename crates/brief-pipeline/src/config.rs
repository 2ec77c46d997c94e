//! Configuration for pipeline runs

use crate::error::{PipelineError, Result};
use brief_guard::GuardrailRule;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// Default primary model served by Groq
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
/// Default fallback model used after a decommissioned-model failure
pub const DEFAULT_FALLBACK_MODEL: &str = "llama-3.1-8b-instant";

/// Configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Primary model identifier
    pub model: String,

    /// Model used after a decommissioned-model failure, if any
    pub fallback_model: Option<String>,

    /// Attempt ceiling per retrying step
    pub max_attempts: u32,

    /// Sleep between consecutive attempts, indexed by attempt and clamped
    /// to the last entry
    pub backoff_seconds: Vec<f64>,

    /// Concurrent sentiment steps allowed in flight
    pub pool_size: usize,

    /// Wall-clock budget for the whole run
    pub run_deadline_seconds: Option<u64>,

    /// Report window length in hours
    pub window_hours: i64,

    /// Model invocations allowed per minute
    pub requests_per_minute: u32,

    /// Insider filings kept per fetch
    pub max_filings: usize,

    /// Posts kept per creator
    pub posts_per_creator: usize,

    /// Guardrail rules applied to summarizer output
    pub summarizer_rules: Vec<GuardrailRule>,

    /// Guardrail rules applied to sentiment output
    pub sentiment_rules: Vec<GuardrailRule>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            fallback_model: Some(DEFAULT_FALLBACK_MODEL.to_string()),
            max_attempts: 3,
            backoff_seconds: vec![1.0, 2.0, 4.0],
            pool_size: 4,
            run_deadline_seconds: None,
            window_hours: 48,
            requests_per_minute: 30,
            max_filings: 20,
            posts_per_creator: 5,
            summarizer_rules: default_summarizer_rules(),
            sentiment_rules: default_sentiment_rules(),
        }
    }
}

/// Default acceptance gate for the summarizer brief
pub fn default_summarizer_rules() -> Vec<GuardrailRule> {
    vec![
        GuardrailRule::blocking("nonempty", json!(null)),
        GuardrailRule::blocking("max_chars", json!({ "limit": 4000 })),
        GuardrailRule::blocking(
            "banned_terms",
            json!({ "terms": ["guaranteed return", "can't lose", "sure thing"] }),
        ),
    ]
}

/// Default acceptance gate for per-creator sentiment JSON
pub fn default_sentiment_rules() -> Vec<GuardrailRule> {
    vec![
        GuardrailRule::blocking("json_object", json!(null)),
        GuardrailRule::blocking("required_fields", json!({ "fields": ["overall", "posts"] })),
        GuardrailRule::blocking("max_chars", json!({ "limit": 6000 })),
    ]
}

impl PipelineConfig {
    /// Create a new configuration builder
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(PipelineError::ConfigError(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        if self.pool_size == 0 {
            return Err(PipelineError::ConfigError(
                "pool_size must be at least 1".to_string(),
            ));
        }

        if self.window_hours < 1 {
            return Err(PipelineError::ConfigError(
                "window_hours must be at least 1".to_string(),
            ));
        }

        if self.requests_per_minute == 0 {
            return Err(PipelineError::ConfigError(
                "requests_per_minute must be at least 1".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(PipelineError::ConfigError(
                "model must not be empty".to_string(),
            ));
        }

        for seconds in &self.backoff_seconds {
            if !seconds.is_finite() || *seconds < 0.0 {
                return Err(PipelineError::ConfigError(format!(
                    "backoff entry {seconds} is not a finite non-negative number"
                )));
            }
        }

        Ok(())
    }

    /// Backoff before the attempt after `attempt` failed
    ///
    /// `attempt` is 1-based; the sequence is clamped to its last entry, so
    /// long retry chains keep a bounded wait. An empty sequence means no
    /// sleep at all.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let Some(last) = self.backoff_seconds.last() else {
            return Duration::ZERO;
        };

        let index = attempt.saturating_sub(1) as usize;
        let seconds = self
            .backoff_seconds
            .get(index)
            .copied()
            .unwrap_or(*last);
        Duration::from_secs_f64(seconds)
    }

    /// Run deadline as a duration, when configured
    pub fn run_deadline(&self) -> Option<Duration> {
        self.run_deadline_seconds.map(Duration::from_secs)
    }
}

/// Builder for PipelineConfig
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    model: Option<String>,
    fallback_model: Option<Option<String>>,
    max_attempts: Option<u32>,
    backoff_seconds: Option<Vec<f64>>,
    pool_size: Option<usize>,
    run_deadline_seconds: Option<u64>,
    window_hours: Option<i64>,
    requests_per_minute: Option<u32>,
    max_filings: Option<usize>,
    posts_per_creator: Option<usize>,
    summarizer_rules: Option<Vec<GuardrailRule>>,
    sentiment_rules: Option<Vec<GuardrailRule>>,
}

impl PipelineConfigBuilder {
    /// Set the primary model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the fallback model
    pub fn fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = Some(Some(model.into()));
        self
    }

    /// Disable the fallback model
    pub fn no_fallback_model(mut self) -> Self {
        self.fallback_model = Some(None);
        self
    }

    /// Set the attempt ceiling
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Set the backoff sequence in seconds
    pub fn backoff_seconds(mut self, seconds: Vec<f64>) -> Self {
        self.backoff_seconds = Some(seconds);
        self
    }

    /// Set the sentiment worker pool size
    pub fn pool_size(mut self, size: usize) -> Self {
        self.pool_size = Some(size);
        self
    }

    /// Set the run deadline in seconds
    pub fn run_deadline_seconds(mut self, seconds: u64) -> Self {
        self.run_deadline_seconds = Some(seconds);
        self
    }

    /// Set the report window length in hours
    pub fn window_hours(mut self, hours: i64) -> Self {
        self.window_hours = Some(hours);
        self
    }

    /// Set the model request budget per minute
    pub fn requests_per_minute(mut self, requests: u32) -> Self {
        self.requests_per_minute = Some(requests);
        self
    }

    /// Set the insider filings cap
    pub fn max_filings(mut self, max: usize) -> Self {
        self.max_filings = Some(max);
        self
    }

    /// Set the per-creator post cap
    pub fn posts_per_creator(mut self, max: usize) -> Self {
        self.posts_per_creator = Some(max);
        self
    }

    /// Replace the summarizer rule set
    pub fn summarizer_rules(mut self, rules: Vec<GuardrailRule>) -> Self {
        self.summarizer_rules = Some(rules);
        self
    }

    /// Replace the sentiment rule set
    pub fn sentiment_rules(mut self, rules: Vec<GuardrailRule>) -> Self {
        self.sentiment_rules = Some(rules);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<PipelineConfig> {
        let defaults = PipelineConfig::default();

        let config = PipelineConfig {
            model: self.model.unwrap_or(defaults.model),
            fallback_model: self.fallback_model.unwrap_or(defaults.fallback_model),
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            backoff_seconds: self.backoff_seconds.unwrap_or(defaults.backoff_seconds),
            pool_size: self.pool_size.unwrap_or(defaults.pool_size),
            run_deadline_seconds: self.run_deadline_seconds,
            window_hours: self.window_hours.unwrap_or(defaults.window_hours),
            requests_per_minute: self
                .requests_per_minute
                .unwrap_or(defaults.requests_per_minute),
            max_filings: self.max_filings.unwrap_or(defaults.max_filings),
            posts_per_creator: self.posts_per_creator.unwrap_or(defaults.posts_per_creator),
            summarizer_rules: self.summarizer_rules.unwrap_or(defaults.summarizer_rules),
            sentiment_rules: self.sentiment_rules.unwrap_or(defaults.sentiment_rules),
        };

        config.validate()?;
        Ok(config)
    }
}
