//! Creator post dataset adapter
//!
//! Reads JSON Lines files of posts from tracked creators. Each line holds
//! one post: `{"creator": "...", "content": "...", "posted_at": "..."}`.
//! Malformed lines are skipped with a warning rather than failing the file.

use async_trait::async_trait;
use brief_core::{DataSource, FetchError, RawRecord, RecordOrigin, ReportWindow};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

const DEFAULT_POSTS_PER_CREATOR: usize = 5;

#[derive(Debug, Deserialize)]
struct PostLine {
    creator: String,
    content: String,
    posted_at: DateTime<Utc>,
}

/// Social-post source backed by local JSON Lines datasets
pub struct CreatorPostsSource {
    paths: Vec<PathBuf>,
    posts_per_creator: usize,
}

impl CreatorPostsSource {
    /// Create a source over one or more JSONL files
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            posts_per_creator: DEFAULT_POSTS_PER_CREATOR,
        }
    }

    /// Cap the posts kept per creator (default 5, earliest lines win)
    pub fn with_posts_per_creator(mut self, posts_per_creator: usize) -> Self {
        self.posts_per_creator = posts_per_creator;
        self
    }
}

#[async_trait]
impl DataSource for CreatorPostsSource {
    async fn fetch(&self, window: &ReportWindow) -> Result<Vec<RawRecord>, FetchError> {
        let mut records = Vec::new();
        for path in &self.paths {
            let content = tokio::fs::read_to_string(path).await?;
            let label = path.display().to_string();
            records.extend(parse_lines(&content, &label, window));
        }

        let records = cap_per_creator(records, self.posts_per_creator);
        debug!(count = records.len(), "Loaded creator posts");
        Ok(records)
    }

    fn origin(&self) -> RecordOrigin {
        RecordOrigin::SocialPost
    }

    fn name(&self) -> &str {
        "creator_posts"
    }
}

/// Parse JSONL content into window-filtered records, preserving line order
fn parse_lines(content: &str, source_label: &str, window: &ReportWindow) -> Vec<RawRecord> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let post: PostLine = match serde_json::from_str(line) {
            Ok(post) => post,
            Err(e) => {
                warn!("Skipping malformed post at {}:{}: {}", source_label, idx + 1, e);
                continue;
            }
        };

        if !window.contains(post.posted_at) {
            continue;
        }

        let source_id = format!("{}#L{}", source_label, idx + 1);
        records.push(
            RawRecord::social_post(source_id, post.posted_at, post.content)
                .with_fields(json!({ "creator": post.creator })),
        );
    }
    records
}

/// Keep the first `limit` records per creator, in input order
fn cap_per_creator(records: Vec<RawRecord>, limit: usize) -> Vec<RawRecord> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    records
        .into_iter()
        .filter(|record| {
            let creator = record.creator().unwrap_or_default().to_string();
            let count = counts.entry(creator).or_insert(0);
            *count += 1;
            *count <= limit
        })
        .collect()
}
