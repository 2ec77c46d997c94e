//! SEC EDGAR current-events feed adapter
//!
//! Pulls the latest Form 4 (insider transaction) filings from EDGAR's
//! current-events Atom feed.
//!
//! Rate limit: 10 requests per second (as per SEC fair access policy)
//! User-Agent requirement: Must include company name and contact email

use async_trait::async_trait;
use brief_core::{DataSource, FetchError, RawRecord, RecordOrigin, ReportWindow};
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use quick_xml::de::from_str;
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const EDGAR_CURRENT_FORM4_URL: &str =
    "https://www.sec.gov/cgi-bin/browse-edgar?action=getcurrent&type=4&count=100&output=atom";
const DEFAULT_MAX_FILINGS: usize = 20;

/// Atom feed structure for EDGAR current events
#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    title: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<Link>,
    updated: Option<String>,
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href")]
    href: Option<String>,
}

/// Insider-filing source backed by the EDGAR Atom feed
pub struct EdgarSource {
    client: Client,
    user_agent: String,
    rate_limiter: SharedRateLimiter,
    max_filings: usize,
}

impl EdgarSource {
    /// Create a source with an explicit User-Agent
    ///
    /// # Arguments
    /// * `user_agent` - Identification in the form "AppName (contact@example.com)"
    pub fn new(user_agent: impl Into<String>) -> Self {
        // SEC allows 10 requests per second
        let quota = Quota::per_second(NonZeroU32::new(10).unwrap());
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: Client::new(),
            user_agent: user_agent.into(),
            rate_limiter,
            max_filings: DEFAULT_MAX_FILINGS,
        }
    }

    /// Create from the `SEC_USER_AGENT` environment variable
    ///
    /// The SEC rejects anonymous clients, so a missing value is an error
    /// rather than a silent default.
    pub fn from_env() -> Result<Self, FetchError> {
        let user_agent = std::env::var("SEC_USER_AGENT")
            .map_err(|_| FetchError::MissingCredential("SEC_USER_AGENT".to_string()))?;
        Ok(Self::new(user_agent))
    }

    /// Cap the number of filings kept per fetch (default 20)
    pub fn with_max_filings(mut self, max_filings: usize) -> Self {
        self.max_filings = max_filings;
        self
    }
}

#[async_trait]
impl DataSource for EdgarSource {
    async fn fetch(&self, window: &ReportWindow) -> Result<Vec<RawRecord>, FetchError> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(EDGAR_CURRENT_FORM4_URL)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| FetchError::Http(format!("EDGAR request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "EDGAR returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(format!("Failed to read EDGAR response: {e}")))?;

        let records = parse_feed(&body, window, self.max_filings)?;
        debug!(count = records.len(), "Fetched EDGAR Form 4 filings");
        Ok(records)
    }

    fn origin(&self) -> RecordOrigin {
        RecordOrigin::InsiderTrade
    }

    fn name(&self) -> &str {
        "sec_edgar"
    }
}

/// Parse the Atom feed into window-filtered records
///
/// The feed lists newest filings first; entries outside the window are
/// dropped and at most `max_filings` are kept.
fn parse_feed(
    xml: &str,
    window: &ReportWindow,
    max_filings: usize,
) -> Result<Vec<RawRecord>, FetchError> {
    let feed: Feed =
        from_str(xml).map_err(|e| FetchError::Parse(format!("EDGAR atom feed: {e}")))?;

    let mut records = Vec::new();
    for entry in feed.entries {
        let Some(updated) = entry.updated.as_deref().and_then(parse_timestamp) else {
            continue;
        };
        if !window.contains(updated) {
            continue;
        }

        let title = entry.title.unwrap_or_default();
        let summary = entry.summary.unwrap_or_default();
        let text = if summary.trim().is_empty() {
            title.trim().to_string()
        } else {
            format!("{}. {}", title.trim(), summary.trim())
        };
        if text.is_empty() {
            continue;
        }

        let link = entry
            .links
            .first()
            .and_then(|l| l.href.clone())
            .unwrap_or_else(|| title.clone());

        records.push(RawRecord::insider_trade(link, updated, text));
        if records.len() >= max_filings {
            break;
        }
    }

    Ok(records)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn feed_fixture(updated: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="ISO-8859-1" ?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Latest Filings - Form 4</title>
  <entry>
    <title>4 - ACME CORP (0001234567) (Issuer)</title>
    <link rel="alternate" type="text/html" href="https://www.sec.gov/Archives/edgar/data/1234567/form4.html"/>
    <summary type="html">Filed: {updated} AccNo: 0001234567-26-000001</summary>
    <updated>{updated}</updated>
  </entry>
  <entry>
    <title>4 - WIDGETS INC (0007654321) (Reporting)</title>
    <link rel="alternate" type="text/html" href="https://www.sec.gov/Archives/edgar/data/7654321/form4.html"/>
    <summary type="html">Filed: {updated}</summary>
    <updated>{updated}</updated>
  </entry>
</feed>"#
        )
    }

    #[test]
    fn test_parse_feed_maps_entries() {
        let window = ReportWindow::last_hours(48);
        let inside = (window.end - Duration::hours(1)).to_rfc3339();
        let xml = feed_fixture(&inside);

        let records = parse_feed(&xml, &window, 20).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].origin, RecordOrigin::InsiderTrade);
        assert!(records[0].text.starts_with("4 - ACME CORP"));
        assert!(records[0].source_id.contains("form4.html"));
    }

    #[test]
    fn test_parse_feed_drops_entries_outside_window() {
        let window = ReportWindow::last_hours(48);
        let stale = (window.start - Duration::hours(5)).to_rfc3339();
        let xml = feed_fixture(&stale);

        let records = parse_feed(&xml, &window, 20).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_feed_caps_at_max_filings() {
        let window = ReportWindow::last_hours(48);
        let inside = (window.end - Duration::hours(1)).to_rfc3339();
        let xml = feed_fixture(&inside);

        let records = parse_feed(&xml, &window, 1).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        let window = ReportWindow::last_hours(1);
        let result = parse_feed("this is not xml <", &window, 20);
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2026-08-24T17:06:42-04:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-08-24T21:06:42+00:00");
        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn test_from_env_requires_user_agent() {
        unsafe {
            std::env::remove_var("SEC_USER_AGENT");
        }
        let result = EdgarSource::from_env();
        assert!(matches!(result, Err(FetchError::MissingCredential(_))));

        unsafe {
            std::env::set_var("SEC_USER_AGENT", "brief (ops@example.com)");
        }
        let source = EdgarSource::from_env().unwrap();
        assert_eq!(source.name(), "sec_edgar");
        unsafe {
            std::env::remove_var("SEC_USER_AGENT");
        }
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_fetch() {
        let source = EdgarSource::new("brief-test (ops@example.com)").with_max_filings(5);
        let window = ReportWindow::last_hours(48);

        let records = source.fetch(&window).await.unwrap();
        assert!(records.len() <= 5);
    }
}
