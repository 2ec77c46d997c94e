//! Daily market-brief pipeline
//!
//! This crate wires the whole daily run together: fetch records for the
//! report window, summarize insider filings, score creator sentiment, and
//! assemble a [`brief_core::DailyReport`]. It includes:
//!
//! - Model invocation with prompt rendering and a shared rate budget
//! - Guardrail-gated retry steps with corrective feedback loops
//! - Concurrent per-creator fan-out under a fixed pool cap
//! - Degradation to notes and placeholders instead of run failures
//!
//! # Architecture
//!
//! `PipelineOrchestrator` owns one `AgentRunner` (provider + prompt catalog +
//! rate budget) and builds a `RetryingAgentStep` per task:
//! - The summarizer step runs first over insider filings
//! - Sentiment steps then fan out per creator, embedding the validated brief
//! - `report::assemble` folds every output into the final report
//!
//! # Example
//!
//! ```rust,ignore
//! use brief_pipeline::{PipelineConfig, PipelineOrchestrator};
//! use brief_core::ReportWindow;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = PipelineOrchestrator::builder()
//!         .provider(/* your provider */)
//!         .config(PipelineConfig::default())
//!         .insider_source(/* EDGAR adapter */)
//!         .posts_source(/* creator-posts adapter */)
//!         .build()?;
//!
//!     let report = orchestrator.run(ReportWindow::last_hours(48)).await;
//!     println!("{}", report.status);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod prompts;
pub mod rate;
pub mod report;
pub mod runner;
pub mod step;

// Re-export main types for convenience
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{PipelineError, Result};
pub use orchestrator::{PipelineOrchestrator, PipelineOrchestratorBuilder};
pub use prompts::PromptCatalog;
pub use rate::RateBudget;
pub use runner::AgentRunner;
pub use step::{DEADLINE_EXCEEDED, RetryingAgentStep, StepState};
