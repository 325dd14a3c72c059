//! Tests for the fetch module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// ============================================================================
// FnFetcher Tests
// ============================================================================

#[tokio::test]
async fn test_fn_fetcher_passes_page_through() {
    let fetcher = FnFetcher::new(|page| async move { Ok(vec![page * 10, page * 10 + 1]) });

    assert_eq!(fetcher.fetch_page(1).await.unwrap(), vec![10, 11]);
    assert_eq!(fetcher.fetch_page(3).await.unwrap(), vec![30, 31]);
}

#[tokio::test]
async fn test_fn_fetcher_propagates_errors() {
    let fetcher: FnFetcher<u32> =
        FnFetcher::new(|page| async move { Err(Error::fetch(page, "backend down")) });

    let err = fetcher.fetch_page(2).await.unwrap_err();
    assert_eq!(err.to_string(), "Fetch failed for page 2: backend down");
}

// ============================================================================
// SliceFetcher Tests
// ============================================================================

#[tokio::test]
async fn test_slice_fetcher_full_page() {
    let fetcher = SliceFetcher::new((0..10).collect::<Vec<i32>>(), 4);

    assert_eq!(fetcher.fetch_page(1).await.unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(fetcher.fetch_page(2).await.unwrap(), vec![4, 5, 6, 7]);
}

#[tokio::test]
async fn test_slice_fetcher_short_tail_page() {
    let fetcher = SliceFetcher::new((0..10).collect::<Vec<i32>>(), 4);

    assert_eq!(fetcher.fetch_page(3).await.unwrap(), vec![8, 9]);
}

#[tokio::test]
async fn test_slice_fetcher_beyond_end_is_empty() {
    let fetcher = SliceFetcher::new((0..10).collect::<Vec<i32>>(), 4);

    assert!(fetcher.fetch_page(4).await.unwrap().is_empty());
    assert!(fetcher.fetch_page(100).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_slice_fetcher_rejects_page_zero() {
    let fetcher = SliceFetcher::new(vec![1, 2, 3], 2);

    assert!(fetcher.fetch_page(0).await.is_err());
}

#[test]
fn test_slice_fetcher_len() {
    let fetcher = SliceFetcher::new(vec![1, 2, 3], 2);
    assert_eq!(fetcher.len(), 3);
    assert!(!fetcher.is_empty());

    let empty: SliceFetcher<i32> = SliceFetcher::new(vec![], 2);
    assert!(empty.is_empty());
}

// ============================================================================
// CachingFetcher Tests
// ============================================================================

/// Counts calls so cache hits are observable
struct CountingFetcher {
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl CountingFetcher {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl PageFetcher for CountingFetcher {
    type Item = u32;

    async fn fetch_page(&self, page: u32) -> crate::error::Result<Vec<u32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::fetch(page, "flaky"));
        }
        Ok(vec![page, page + 100])
    }
}

#[tokio::test]
async fn test_caching_fetcher_hits_cache() {
    let inner = CountingFetcher::new();
    let fetcher = CachingFetcher::new(inner);

    let first = fetcher.fetch_page(1).await.unwrap();
    let second = fetcher.fetch_page(1).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fetcher.inner_calls(), 1);
    assert_eq!(fetcher.cached_pages().await, 1);
}

#[tokio::test]
async fn test_caching_fetcher_distinct_pages_miss() {
    let fetcher = CachingFetcher::new(CountingFetcher::new());

    fetcher.fetch_page(1).await.unwrap();
    fetcher.fetch_page(2).await.unwrap();

    assert_eq!(fetcher.inner_calls(), 2);
    assert_eq!(fetcher.cached_pages().await, 2);
}

#[tokio::test]
async fn test_caching_fetcher_never_caches_failures() {
    let inner = CountingFetcher::new();
    inner.fail.store(true, Ordering::SeqCst);
    let fetcher = CachingFetcher::new(inner);

    assert!(fetcher.fetch_page(1).await.is_err());
    assert_eq!(fetcher.cached_pages().await, 0);

    // Retry reaches the source again
    assert!(fetcher.fetch_page(1).await.is_err());
    assert_eq!(fetcher.inner_calls(), 2);
}

#[tokio::test]
async fn test_caching_fetcher_without_cache_passthrough() {
    let fetcher = CachingFetcher::without_cache(CountingFetcher::new());

    fetcher.fetch_page(1).await.unwrap();
    fetcher.fetch_page(1).await.unwrap();

    assert_eq!(fetcher.inner_calls(), 2);
    assert_eq!(fetcher.cached_pages().await, 0);
}

#[tokio::test]
async fn test_caching_fetcher_clear() {
    let fetcher = CachingFetcher::new(CountingFetcher::new());

    fetcher.fetch_page(1).await.unwrap();
    assert_eq!(fetcher.cached_pages().await, 1);

    fetcher.clear().await;
    assert_eq!(fetcher.cached_pages().await, 0);

    fetcher.fetch_page(1).await.unwrap();
    assert_eq!(fetcher.inner_calls(), 2);
}

impl CachingFetcher<CountingFetcher> {
    fn inner_calls(&self) -> usize {
        self.inner().calls.load(Ordering::SeqCst)
    }
}
