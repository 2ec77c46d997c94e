//! Data-source adapters for the insider-brief pipeline
//!
//! Two concrete [`brief_core::DataSource`] implementations:
//!
//! - [`EdgarSource`] pulls recent Form 4 insider-trading filings from the
//!   SEC EDGAR current-events Atom feed
//! - [`CreatorPostsSource`] reads tracked-creator posts from local JSON
//!   Lines datasets
//!
//! Both normalize upstream items into [`brief_core::RawRecord`] values and
//! surface failures as [`brief_core::FetchError`], which the orchestrator
//! absorbs into an empty category.

pub mod edgar;
pub mod posts;

pub use edgar::EdgarSource;
pub use posts::CreatorPostsSource;
