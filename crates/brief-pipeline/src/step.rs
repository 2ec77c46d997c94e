//! Retrying agent step
//!
//! Drives one task to a terminal outcome: invoke the runner, validate the
//! output, retry with corrective feedback while the attempt budget lasts.
//! The state machine is an explicit tagged enum so attempt count and the
//! last failure are inspectable at any point, and `run` never raises: every
//! path ends in a terminal [`AgentOutput`].

use crate::config::PipelineConfig;
use crate::runner::AgentRunner;
use brief_core::{AgentOutput, AgentRole, AgentTask};
use brief_guard::{GuardrailRule, GuardrailValidator, ValidationResult};
use std::sync::Arc;
use tokio::time::{Instant, sleep};
use tracing::{debug, instrument, warn};

/// Failure reason recorded when the run deadline cuts a step off
pub const DEADLINE_EXCEEDED: &str = "deadline_exceeded";

/// Observable state of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepState {
    /// No attempt started yet
    Pending,
    /// A model invocation is in flight
    Running { attempt: u32 },
    /// Output is being validated
    Validating { attempt: u32 },
    /// Last attempt failed; another one will start after backoff
    Retrying { attempt: u32, reason: String },
    /// Terminal: output passed all blocking rules
    Succeeded { attempts: u32 },
    /// Terminal: attempt budget spent or failure was not retryable
    Exhausted { attempts: u32, reason: String },
}

impl StepState {
    /// Whether the step has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Exhausted { .. })
    }
}

/// Runs one task until validated or out of attempts
pub struct RetryingAgentStep {
    runner: Arc<AgentRunner>,
    validator: GuardrailValidator,
    rules: Vec<GuardrailRule>,
    config: Arc<PipelineConfig>,
    deadline: Option<Instant>,
    state: StepState,
    validation_history: Vec<ValidationResult>,
}

impl RetryingAgentStep {
    /// Create a step over a runner and the rule set for its role
    pub fn new(
        runner: Arc<AgentRunner>,
        rules: Vec<GuardrailRule>,
        config: Arc<PipelineConfig>,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            runner,
            validator: GuardrailValidator::new(),
            rules,
            config,
            deadline,
            state: StepState::Pending,
            validation_history: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> &StepState {
        &self.state
    }

    /// One validation result per attempt that reached validation
    pub fn validation_history(&self) -> &[ValidationResult] {
        &self.validation_history
    }

    /// Drive the task to a terminal output
    ///
    /// Checks the run deadline before every attempt and sleeps the
    /// configured backoff between attempts, never after the last one.
    #[instrument(skip_all, fields(task = %task.label()))]
    pub async fn run(&mut self, mut task: AgentTask) -> AgentOutput {
        let role = task.role;
        let creator = task.creator().map(str::to_string);
        let max_attempts = self.config.max_attempts;
        let mut last_content = String::new();

        for attempt in 1..=max_attempts {
            if self.deadline_expired() {
                warn!(attempt, "Run deadline expired before attempt");
                return self.exhaust(role, creator, last_content, attempt - 1, DEADLINE_EXCEEDED);
            }

            self.state = StepState::Running { attempt };
            task.attempt = attempt;

            let content = match self.runner.run(&task).await {
                Ok(content) => content,
                Err(e) => {
                    if e.wants_fallback() {
                        if let Some(fallback) = self.fallback_model(&task) {
                            debug!(model = %fallback, "Switching task to fallback model");
                            task.context.set_model_override(fallback);
                        }
                    }

                    let reason = e.to_string();
                    if e.is_retryable() && attempt < max_attempts {
                        warn!(attempt, error = %reason, "Model attempt failed, retrying");
                        self.state = StepState::Retrying { attempt, reason };
                        sleep(self.config.backoff_for(attempt)).await;
                        continue;
                    }

                    warn!(attempt, error = %reason, "Model attempt failed, giving up");
                    return self.exhaust(role, creator, last_content, attempt, &reason);
                }
            };

            self.state = StepState::Validating { attempt };
            let result = self.validator.validate(&content, &self.rules);
            last_content = content;

            if result.passed {
                self.validation_history.push(result);
                self.state = StepState::Succeeded { attempts: attempt };
                debug!(attempt, "Step succeeded");
                return AgentOutput::validated(role, creator, last_content, attempt);
            }

            let reason = format!("validation failed: {}", result.summary());
            if let Some(hint) = &result.hint {
                task.context.push_feedback(hint.clone());
            }
            self.validation_history.push(result);

            if attempt < max_attempts {
                warn!(attempt, %reason, "Output rejected, retrying with feedback");
                self.state = StepState::Retrying { attempt, reason };
                sleep(self.config.backoff_for(attempt)).await;
            } else {
                warn!(attempt, %reason, "Output rejected, attempt budget spent");
                return self.exhaust(role, creator, last_content, attempt, &reason);
            }
        }

        // Only reachable with max_attempts == 0, which validate() rejects
        self.exhaust(role, creator, last_content, 0, "no attempts configured")
    }

    fn exhaust(
        &mut self,
        role: AgentRole,
        creator: Option<String>,
        last_content: String,
        attempts: u32,
        reason: &str,
    ) -> AgentOutput {
        self.state = StepState::Exhausted {
            attempts,
            reason: reason.to_string(),
        };
        AgentOutput::exhausted(role, creator, last_content, attempts, reason)
    }

    fn fallback_model(&self, task: &AgentTask) -> Option<String> {
        if task.context.model_override().is_some() {
            return None;
        }
        self.config.fallback_model.clone()
    }

    fn deadline_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}
