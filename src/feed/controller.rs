//! Feed controller implementation
//!
//! Owns the accumulated items, the page cursor, and the loading and
//! exhaustion flags. Cloned handles share one instance.

use super::trigger::FeedTrigger;
use super::types::{FeedConfig, FeedSnapshot, LoadOutcome, LoadPhase, LoadStats};
use crate::fetch::PageFetcher;
use crate::monitor::{DiagnosticRecord, ErrorReporter, LogReporter};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, warn};

/// Internal mutable state, shared across clones
struct FeedState<T> {
    items: Vec<T>,
    /// Next page to request, 1-based
    page: u32,
    loading: bool,
    exhausted: bool,
    stats: LoadStats,
}

impl<T> FeedState<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            loading: false,
            exhausted: false,
            stats: LoadStats::new(),
        }
    }

    fn phase(&self) -> LoadPhase {
        if self.exhausted {
            LoadPhase::Exhausted
        } else if self.loading {
            LoadPhase::Loading
        } else {
            LoadPhase::Idle
        }
    }
}

/// Incremental load controller for a paginated feed
///
/// State is created fresh per logical list view and discarded with the
/// last handle; nothing is process-wide.
pub struct FeedController<T> {
    config: FeedConfig,
    fetcher: Arc<dyn PageFetcher<Item = T>>,
    reporter: Arc<dyn ErrorReporter>,
    state: Arc<RwLock<FeedState<T>>>,
}

impl<T: Send + Sync + 'static> FeedController<T> {
    /// Create a controller reporting failures through `tracing`
    pub fn new(config: FeedConfig, fetcher: Arc<dyn PageFetcher<Item = T>>) -> Self {
        Self::with_reporter(config, fetcher, Arc::new(LogReporter))
    }

    /// Create a controller with a custom failure reporter
    pub fn with_reporter(
        mut config: FeedConfig,
        fetcher: Arc<dyn PageFetcher<Item = T>>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        // a zero page size could never latch exhaustion
        config.page_size = config.page_size.max(1);

        Self {
            config,
            fetcher,
            reporter,
            state: Arc::new(RwLock::new(FeedState::new())),
        }
    }

    /// Request the next page from the fetch collaborator
    ///
    /// A call made while a fetch is outstanding, or after the feed is
    /// exhausted, is a no-op. Fetch failures are reported to the error
    /// reporter and never surfaced here; the cursor stays put so the
    /// next call retries the same page.
    pub async fn load_more(&self) -> LoadOutcome {
        // Check-and-set under one lock acquisition; the lock is not
        // held across the fetch await
        let page = {
            let mut state = self.state.write().await;
            if state.loading || state.exhausted {
                state.stats.add_skipped();
                return LoadOutcome::Skipped;
            }
            state.loading = true;
            state.page
        };

        let page_size = self.config.page_size as usize;

        match self.fetcher.fetch_page(page).await {
            Ok(records) => {
                let count = records.len();
                if count > page_size {
                    warn!(
                        page,
                        count, page_size, "page exceeded configured size, accepting as-is"
                    );
                }
                let short = count < page_size;

                let mut state = self.state.write().await;
                state.items.extend(records);
                state.page += 1;
                state.loading = false;
                state.stats.add_page(count);

                if short {
                    state.exhausted = true;
                    debug!(page, count, "short page, feed exhausted");
                    LoadOutcome::Exhausted(count)
                } else {
                    debug!(page, count, "page loaded");
                    LoadOutcome::Loaded(count)
                }
            }
            Err(e) => {
                self.reporter.report(&DiagnosticRecord::new(page, &e));

                let mut state = self.state.write().await;
                state.loading = false;
                state.stats.add_failure();
                LoadOutcome::Failed
            }
        }
    }

    /// Build a debounced trigger for this controller
    pub fn trigger(&self) -> FeedTrigger<T> {
        FeedTrigger::new(self.clone())
    }

    // ========================================================================
    // State accessors
    // ========================================================================

    /// Read guard over the accumulated items
    ///
    /// Hold it briefly; `load_more` needs the write side to settle.
    pub async fn items(&self) -> RwLockReadGuard<'_, Vec<T>> {
        RwLockReadGuard::map(self.state.read().await, |state| &state.items)
    }

    /// Clone of the accumulated items
    pub async fn items_cloned(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.state.read().await.items.clone()
    }

    /// Number of accumulated items
    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    /// Check if nothing has been loaded yet
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.items.is_empty()
    }

    /// Check if a fetch is outstanding
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Check if more pages may exist
    pub async fn has_more(&self) -> bool {
        !self.state.read().await.exhausted
    }

    /// Next page the controller will request
    pub async fn next_page(&self) -> u32 {
        self.state.read().await.page
    }

    /// Current phase of the controller
    pub async fn phase(&self) -> LoadPhase {
        self.state.read().await.phase()
    }

    /// Cheap copy of the observable state
    pub async fn snapshot(&self) -> FeedSnapshot {
        let state = self.state.read().await;
        FeedSnapshot {
            item_count: state.items.len(),
            next_page: state.page,
            phase: state.phase(),
        }
    }

    /// Copy of the load counters
    pub async fn stats(&self) -> LoadStats {
        self.state.read().await.stats.clone()
    }

    /// The controller's configuration
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }
}

impl<T> Clone for FeedController<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            fetcher: Arc::clone(&self.fetcher),
            reporter: Arc::clone(&self.reporter),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> std::fmt::Debug for FeedController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedController")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
