//! Time window covered by one pipeline run

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Half-closed time window `[start, end]` a report covers
///
/// Records with timestamps outside the window are dropped at fetch time, and
/// the window travels with the finished report as run metadata.
///
/// # Example
///
/// ```
/// use brief_core::ReportWindow;
///
/// let window = ReportWindow::last_hours(48);
/// assert!(window.start < window.end);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// Create a window with explicit bounds
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window ending now and reaching `hours` back
    pub fn last_hours(hours: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::hours(hours),
            end,
        }
    }

    /// Whether `ts` falls inside the window (bounds inclusive)
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }
}

impl std::fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.format("%Y-%m-%d %H:%M UTC"),
            self.end.format("%Y-%m-%d %H:%M UTC")
        )
    }
}
