//! Page sources and the fetch contract
//!
//! Supports: async closures, in-memory collections, caching wrapper
//!
//! # Overview
//!
//! The fetch module defines the outbound contract between the load
//! controller and its data source. A source hands back one page of items
//! per call; the controller compares the returned length against its
//! configured page size to infer exhaustion. Sources are expected to be
//! idempotent enough that the same page can be safely re-requested after
//! a failure.

mod cache;
mod sources;

pub use cache::CachingFetcher;
pub use sources::{FnFetcher, SliceFetcher};

use crate::error::Result;
use async_trait::async_trait;

/// A source of fixed-size pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Item type produced by this source
    type Item;

    /// Fetch the given page (1-based)
    ///
    /// A short page (fewer items than the caller's page size) signals
    /// that the collection is exhausted.
    async fn fetch_page(&self, page: u32) -> Result<Vec<Self::Item>>;
}

#[cfg(test)]
mod tests;
