//! Agent tasks and their execution context
//!
//! An [`AgentTask`] is the unit of work driven through the retrying step:
//! a role, the record subset it operates on, and a [`TaskContext`] that
//! accumulates state across attempts (corrective feedback, the summarizer
//! output handed to sentiment tasks, a model override after a fallback).

use crate::record::RecordSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Accumulated corrective feedback (JSON array of strings), one entry
    /// per failed validation
    pub const FEEDBACK: &str = "feedback";
    /// Validated summarizer output, available to sentiment tasks
    pub const SUMMARY: &str = "summary";
    /// Creator the task scores (sentiment tasks only)
    pub const CREATOR: &str = "creator";
    /// Model to use instead of the configured primary (set after a
    /// decommissioned-model failure)
    pub const MODEL_OVERRIDE: &str = "model_override";
}

/// Logical agent role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Summarizes insider filings into a bulleted brief
    Summarizer,
    /// Scores creator posts for sentiment
    Sentiment,
}

impl AgentRole {
    /// Stable string form used in logs and report sections
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summarizer => "summarizer",
            Self::Sentiment => "sentiment",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable key-value state carried by a task across attempts
///
/// # Example
///
/// ```
/// use brief_core::TaskContext;
///
/// let mut ctx = TaskContext::new().with_creator("alice");
/// ctx.push_feedback("shorten the response");
///
/// assert_eq!(ctx.creator(), Some("alice"));
/// assert_eq!(ctx.feedback(), vec!["shorten the response"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskContext {
    data: HashMap<String, serde_json::Value>,
}

impl TaskContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the creator this task scores
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.insert(keys::CREATOR, serde_json::json!(creator.into()));
        self
    }

    /// Set the summarizer output visible to this task
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.insert(keys::SUMMARY, serde_json::json!(summary.into()));
        self
    }

    /// Creator label, when present
    pub fn creator(&self) -> Option<&str> {
        self.get(keys::CREATOR).and_then(|v| v.as_str())
    }

    /// Summarizer output, when present
    pub fn summary(&self) -> Option<&str> {
        self.get(keys::SUMMARY).and_then(|v| v.as_str())
    }

    /// Model override, when set by a fallback transition
    pub fn model_override(&self) -> Option<&str> {
        self.get(keys::MODEL_OVERRIDE).and_then(|v| v.as_str())
    }

    /// Route subsequent attempts to a different model
    pub fn set_model_override(&mut self, model: impl Into<String>) {
        self.insert(keys::MODEL_OVERRIDE, serde_json::json!(model.into()));
    }

    /// Append one corrective hint for the next attempt
    pub fn push_feedback(&mut self, hint: impl Into<String>) {
        let entry = serde_json::Value::String(hint.into());
        match self.data.get_mut(keys::FEEDBACK) {
            Some(serde_json::Value::Array(items)) => items.push(entry),
            _ => {
                self.data
                    .insert(keys::FEEDBACK.to_string(), serde_json::Value::Array(vec![entry]));
            }
        }
    }

    /// All accumulated feedback, oldest first
    pub fn feedback(&self) -> Vec<&str> {
        self.get(keys::FEEDBACK)
            .and_then(|v| v.as_array())
            .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    /// Insert a raw value
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a raw value
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Check whether a key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the context holds no entries
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Merge another context into this one (other values override)
    pub fn merge(&mut self, other: TaskContext) {
        self.data.extend(other.data);
    }
}

/// One unit of agent work
///
/// Created per stage invocation and destroyed after the step reaches a
/// terminal outcome. The attempt counter starts at 0 and is advanced by the
/// retrying step, never past the configured ceiling.
#[derive(Debug, Clone)]
pub struct AgentTask {
    pub role: AgentRole,
    /// Record subset this task operates on; shared, never mutated
    pub records: RecordSet,
    pub context: TaskContext,
    /// Attempts consumed so far
    pub attempt: u32,
}

impl AgentTask {
    /// Create a fresh task with an empty context
    pub fn new(role: AgentRole, records: RecordSet) -> Self {
        Self {
            role,
            records,
            context: TaskContext::new(),
            attempt: 0,
        }
    }

    /// Replace the context wholesale
    pub fn with_context(mut self, context: TaskContext) -> Self {
        self.context = context;
        self
    }

    /// Creator label for sentiment tasks
    pub fn creator(&self) -> Option<&str> {
        self.context.creator()
    }

    /// Log-friendly label: `summarizer` or `sentiment/<creator>`
    pub fn label(&self) -> String {
        match self.creator() {
            Some(creator) => format!("{}/{creator}", self.role),
            None => self.role.to_string(),
        }
    }
}
