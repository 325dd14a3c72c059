//! Page-level response caching
//!
//! Memoizes successful pages by page number so a remounted view can
//! replay a feed without refetching. Failures are never cached.

use super::PageFetcher;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Caching wrapper around another [`PageFetcher`]
pub struct CachingFetcher<F: PageFetcher> {
    inner: F,
    cache: RwLock<HashMap<u32, Vec<F::Item>>>,
    use_cache: bool,
}

impl<F: PageFetcher> CachingFetcher<F> {
    /// Wrap a fetcher with caching enabled
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
            use_cache: true,
        }
    }

    /// Wrap a fetcher with caching disabled (pure passthrough)
    pub fn without_cache(inner: F) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
            use_cache: false,
        }
    }

    /// Get the wrapped fetcher
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Number of pages currently cached
    pub async fn cached_pages(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Drop all cached pages
    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }
}

#[async_trait]
impl<F> PageFetcher for CachingFetcher<F>
where
    F: PageFetcher + 'static,
    F::Item: Clone + Send + Sync,
{
    type Item = F::Item;

    async fn fetch_page(&self, page: u32) -> Result<Vec<F::Item>> {
        if self.use_cache {
            if let Some(hit) = self.cache.read().await.get(&page) {
                return Ok(hit.clone());
            }
        }

        let records = self.inner.fetch_page(page).await?;

        if self.use_cache {
            self.cache.write().await.insert(page, records.clone());
        }

        Ok(records)
    }
}

impl<F: PageFetcher + std::fmt::Debug> std::fmt::Debug for CachingFetcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingFetcher")
            .field("inner", &self.inner)
            .field("use_cache", &self.use_cache)
            .finish_non_exhaustive()
    }
}
