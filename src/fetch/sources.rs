//! Page source implementations
//!
//! Each source adapts a different kind of backing data to the
//! [`PageFetcher`] contract.

use super::PageFetcher;
use crate::error::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

// ============================================================================
// Closure-backed source
// ============================================================================

/// Adapts an async closure into a [`PageFetcher`]
///
/// The closest analogue to handing a fetch callback straight to the
/// controller:
///
/// ```rust,ignore
/// let fetcher = FnFetcher::new(|page| async move {
///     api.list_companies(page).await
/// });
/// ```
pub struct FnFetcher<T> {
    callback: Box<dyn Fn(u32) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync>,
}

impl<T: Send + 'static> FnFetcher<T> {
    /// Wrap an async closure taking a 1-based page number
    pub fn new<F, Fut>(callback: F) -> Self
    where
        F: Fn(u32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        Self {
            callback: Box::new(move |page| Box::pin(callback(page))),
        }
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> PageFetcher for FnFetcher<T> {
    type Item = T;

    async fn fetch_page(&self, page: u32) -> Result<Vec<T>> {
        (self.callback)(page).await
    }
}

impl<T> std::fmt::Debug for FnFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}

// ============================================================================
// In-memory source
// ============================================================================

/// Serves fixed-size pages from an in-memory collection
///
/// Handy for demos and tests: the final page is short (or empty), so a
/// controller reading from it exhausts naturally.
#[derive(Debug, Clone)]
pub struct SliceFetcher<T> {
    items: Arc<Vec<T>>,
    page_size: usize,
}

impl<T> SliceFetcher<T> {
    /// Create a source over `items`, serving `page_size` items per page
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items: Arc::new(items),
            // a zero page size would never make progress
            page_size: page_size.max(1),
        }
    }

    /// Total number of backing items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the backing collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> PageFetcher for SliceFetcher<T> {
    type Item = T;

    async fn fetch_page(&self, page: u32) -> Result<Vec<T>> {
        if page == 0 {
            return Err(crate::error::Error::fetch(page, "pages are 1-based"));
        }
        let start = (page as usize - 1) * self.page_size;
        Ok(self
            .items
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect())
    }
}
