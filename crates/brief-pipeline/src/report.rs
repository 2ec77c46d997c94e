//! Report assembly
//!
//! Folds the step outputs of one run into a [`DailyReport`]. Assembly never
//! fails: exhausted steps become placeholder sections plus a degradation
//! note, so a report always accounts for every step that ran.

use brief_core::{
    AgentOutput, DailyReport, DegradationNote, ReportSection, ReportStatus, ReportWindow,
};
use chrono::Utc;

/// Build the final report from step outputs and fetch-stage notes
///
/// Section order follows `outputs` order. Every output that failed validation
/// contributes a note scoped to its label (`summarizer`, `sentiment/<creator>`)
/// on top of the fetch notes already collected.
pub fn assemble(
    window: ReportWindow,
    outputs: &[AgentOutput],
    mut notes: Vec<DegradationNote>,
) -> DailyReport {
    let generated_at = Utc::now();

    let sections = outputs
        .iter()
        .map(|output| ReportSection {
            role: output.role,
            creator: output.creator.clone(),
            content: section_content(output),
            generated_at,
        })
        .collect();

    for output in outputs.iter().filter(|output| !output.validated) {
        let reason = output
            .failure_reason
            .clone()
            .unwrap_or_else(|| "unknown failure".to_string());
        notes.push(DegradationNote::new(output.label(), reason));
    }

    DailyReport {
        window,
        status: status_for(outputs),
        sections,
        notes,
        generated_at,
    }
}

/// Overall run status: every output validated, some, or none
pub fn status_for(outputs: &[AgentOutput]) -> ReportStatus {
    let validated = outputs.iter().filter(|output| output.validated).count();
    if validated == outputs.len() && !outputs.is_empty() {
        ReportStatus::Complete
    } else if validated > 0 {
        ReportStatus::Partial
    } else {
        ReportStatus::Failed
    }
}

fn section_content(output: &AgentOutput) -> String {
    if output.validated {
        return output.content.clone();
    }
    let reason = output.failure_reason.as_deref().unwrap_or("unknown failure");
    format!(
        "Content unavailable: {reason} (after {} attempt{}).",
        output.attempts,
        if output.attempts == 1 { "" } else { "s" }
    )
}
