//! Fetched source records
//!
//! A [`RawRecord`] is one unit of upstream data (an insider filing or a
//! creator post) normalized at fetch time. The record set handed to a run is
//! shared as an immutable slice; nothing downstream rewrites it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Immutable, shareable record set for one pipeline run
pub type RecordSet = Arc<[RawRecord]>;

/// Which upstream category a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    /// SEC Form 4 insider-trading disclosure
    InsiderTrade,
    /// Post from a tracked creator
    SocialPost,
}

impl RecordOrigin {
    /// Stable string form used in logs and report notes
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsiderTrade => "insider_trade",
            Self::SocialPost => "social_post",
        }
    }
}

impl std::fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized upstream record
///
/// The text body carries whatever the adapter considered the useful payload
/// (filing title plus summary, post content). Structured extras that do not
/// fit the body go into `fields`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    /// Stable identifier from the upstream source (filing URL, post id)
    pub source_id: String,
    /// When the upstream item was published
    pub timestamp: DateTime<Utc>,
    /// Normalized text payload
    pub text: String,
    /// Optional structured payload fields (e.g. creator name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
    pub origin: RecordOrigin,
}

impl RawRecord {
    /// Create an insider-trade record
    pub fn insider_trade(
        source_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            timestamp,
            text: text.into(),
            fields: None,
            origin: RecordOrigin::InsiderTrade,
        }
    }

    /// Create a social-post record
    pub fn social_post(
        source_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            timestamp,
            text: text.into(),
            fields: None,
            origin: RecordOrigin::SocialPost,
        }
    }

    /// Attach structured payload fields
    pub fn with_fields(mut self, fields: serde_json::Value) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Creator name for social posts, read from the structured fields
    pub fn creator(&self) -> Option<&str> {
        self.fields
            .as_ref()
            .and_then(|f| f.get("creator"))
            .and_then(|v| v.as_str())
    }
}
