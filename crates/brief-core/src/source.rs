//! Data-source seam
//!
//! Concrete fetchers (EDGAR filings, creator-post datasets) implement
//! [`DataSource`]; the orchestrator holds one adapter per record origin and
//! only depends on this contract. Transport, auth, and pagination are the
//! adapter's concern.

use crate::error::FetchError;
use crate::record::{RawRecord, RecordOrigin};
use crate::window::ReportWindow;
use async_trait::async_trait;

/// One upstream data source, scoped to a single record origin
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch records published inside `window`
    ///
    /// Returns records in upstream order. Errors are category-scoped; the
    /// caller degrades to an empty set rather than aborting the run.
    async fn fetch(&self, window: &ReportWindow) -> Result<Vec<RawRecord>, FetchError>;

    /// Which record category this adapter produces
    fn origin(&self) -> RecordOrigin;

    /// Adapter name for logs
    fn name(&self) -> &str;
}
