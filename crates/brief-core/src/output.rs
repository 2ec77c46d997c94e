//! Agent outputs and the assembled daily report

use crate::task::AgentRole;
use crate::window::ReportWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal result of one retrying step
///
/// Always produced, whether the step succeeded or exhausted its budget.
/// `validated` is true only when the content passed every blocking
/// guardrail rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutput {
    pub role: AgentRole,
    /// Creator label for per-creator sentiment outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Raw agent result; for exhausted steps, the last attempt's content
    /// (may be empty when no attempt produced text)
    pub content: String,
    pub validated: bool,
    /// Model attempts consumed by the step
    pub attempts: u32,
    /// Why the step exhausted, absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl AgentOutput {
    /// Output for a step that passed validation
    pub fn validated(
        role: AgentRole,
        creator: Option<String>,
        content: impl Into<String>,
        attempts: u32,
    ) -> Self {
        Self {
            role,
            creator,
            content: content.into(),
            validated: true,
            attempts,
            failure_reason: None,
        }
    }

    /// Output for a step that gave up
    pub fn exhausted(
        role: AgentRole,
        creator: Option<String>,
        last_content: impl Into<String>,
        attempts: u32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            role,
            creator,
            content: last_content.into(),
            validated: false,
            attempts,
            failure_reason: Some(reason.into()),
        }
    }

    /// Section label: `summarizer` or `sentiment/<creator>`
    pub fn label(&self) -> String {
        match &self.creator {
            Some(creator) => format!("{}/{creator}", self.role),
            None => self.role.to_string(),
        }
    }
}

/// One finalized report section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub role: AgentRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    pub content: String,
    pub generated_at: DateTime<Utc>,
}

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Every role produced validated content
    Complete,
    /// At least one role produced validated content
    Partial,
    /// No role produced validated content
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a part of the report is degraded or missing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationNote {
    /// What the note refers to: `fetch/insider_trade`, `summarizer`,
    /// `sentiment/<creator>`
    pub scope: String,
    pub reason: String,
}

impl DegradationNote {
    pub fn new(scope: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            reason: reason.into(),
        }
    }
}

/// Final deliverable of one pipeline run
///
/// A run always produces a report object, even when every stage failed;
/// `status` plus `notes` say what is live, degraded, or missing and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub window: ReportWindow,
    pub status: ReportStatus,
    /// Sections in deterministic order: summarizer first, then sentiment
    /// per creator in input order
    pub sections: Vec<ReportSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<DegradationNote>,
    pub generated_at: DateTime<Utc>,
}
