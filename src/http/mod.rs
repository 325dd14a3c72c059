//! HTTP-backed page fetching
//!
//! Provides a production [`crate::fetch::PageFetcher`] over a REST list
//! endpoint that handles:
//! - Page-number query parameters (plus an optional page-size parameter)
//! - Automatic retries with configurable backoff
//! - Rate limiting to prevent API throttling
//! - Extracting the records array out of enveloped response bodies

mod fetcher;

pub use fetcher::{HttpFetcherConfig, HttpPageFetcher};
