//! Core domain types for the insider-brief pipeline
//!
//! This crate defines the data model shared by every stage of the pipeline:
//! fetched records, agent tasks and their mutable context, agent outputs, and
//! the assembled daily report. It also defines the [`DataSource`] seam that
//! concrete fetchers implement.

pub mod error;
pub mod output;
pub mod record;
pub mod source;
pub mod task;
pub mod window;

pub use error::FetchError;
pub use output::{AgentOutput, DailyReport, DegradationNote, ReportSection, ReportStatus};
pub use record::{RawRecord, RecordOrigin, RecordSet};
pub use source::DataSource;
pub use task::{AgentRole, AgentTask, TaskContext};
pub use window::ReportWindow;
