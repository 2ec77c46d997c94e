//! Report rendering and persistence
//!
//! Turns a [`DailyReport`] into a Markdown document on disk and appends the
//! raw report to a JSONL run log, so every run leaves both a readable brief
//! and a machine-readable record under the output directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use brief_core::{AgentRole, DailyReport};

const RUN_LOG_FILE: &str = "runs.jsonl";

/// Render the report as a Markdown document
pub fn render_markdown(report: &DailyReport) -> String {
    let mut doc = String::new();

    doc.push_str("# Daily Market Brief\n\n");
    doc.push_str(&format!("Window: {}\n\n", report.window));
    doc.push_str(&format!("Status: {}\n\n", report.status));

    for section in &report.sections {
        match section.role {
            AgentRole::Summarizer => doc.push_str("## Insider Filings\n\n"),
            AgentRole::Sentiment => {
                let creator = section.creator.as_deref().unwrap_or("unknown");
                doc.push_str(&format!("## Creator Sentiment: {creator}\n\n"));
            }
        }
        doc.push_str(&section.content);
        doc.push_str("\n\n");
    }

    if !report.notes.is_empty() {
        doc.push_str("## Degradations\n\n");
        for note in &report.notes {
            doc.push_str(&format!("- `{}`: {}\n", note.scope, note.reason));
        }
        doc.push('\n');
    }

    doc
}

/// Write the Markdown brief under `out_dir`, named after the run timestamp
pub fn write_report(report: &DailyReport, out_dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let name = format!(
        "brief-{}.md",
        report.generated_at.format("%Y-%m-%d-%H%M%S")
    );
    let path = out_dir.join(name);
    std::fs::write(&path, render_markdown(report))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Append the serialized report to the JSONL run log under `out_dir`
pub fn append_run_log(report: &DailyReport, out_dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let path = out_dir.join(RUN_LOG_FILE);
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let line = serde_json::to_string(report)?;
    writeln!(file, "{line}")?;
    Ok(path)
}
