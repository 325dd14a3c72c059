//! Feed types and configuration
//!
//! Defines the controller's configuration, phases, outcomes, and stats.

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for a feed controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Number of items expected per full page
    pub page_size: u32,
    /// Debounce window for the trigger, in milliseconds
    pub debounce_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl FeedConfig {
    /// Create a config with the given page size
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    /// Set the trigger debounce window
    #[must_use]
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce_ms = window.as_millis() as u64;
        self
    }

    /// The debounce window as a [`Duration`]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_config("page_size", "must be at least 1"));
        }
        Ok(())
    }
}

// ============================================================================
// Load Phase
// ============================================================================

/// Where the controller is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// No fetch outstanding, more pages may exist
    Idle,
    /// A fetch is outstanding
    Loading,
    /// A short page arrived; no further fetches will be issued
    Exhausted,
}

impl LoadPhase {
    /// Check if the controller is idle
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if a fetch is outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if the feed is exhausted
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

// ============================================================================
// Load Outcome
// ============================================================================

/// Result of a `load_more` call
///
/// Carries item counts only; failure detail goes to the error reporter,
/// never to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A full page was appended; more may follow
    Loaded(usize),
    /// A short page was appended; the feed is now exhausted
    Exhausted(usize),
    /// The call was a no-op (already loading, or already exhausted)
    Skipped,
    /// The fetch failed; state is unchanged and the page will be retried
    Failed,
}

impl LoadOutcome {
    /// Number of items this call appended
    pub fn items_added(&self) -> usize {
        match self {
            Self::Loaded(count) | Self::Exhausted(count) => *count,
            Self::Skipped | Self::Failed => 0,
        }
    }

    /// Check if this call was a no-op
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Check if this call failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Cheap copy of the observable feed state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// Number of accumulated items
    pub item_count: usize,
    /// Next page the controller will request
    pub next_page: u32,
    /// Current phase
    pub phase: LoadPhase,
}

impl FeedSnapshot {
    /// Check if a fetch is outstanding
    pub fn loading(&self) -> bool {
        self.phase.is_loading()
    }

    /// Check if more pages may exist
    pub fn has_more(&self) -> bool {
        !self.phase.is_exhausted()
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Per-instance load counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Pages successfully appended
    pub pages_loaded: usize,
    /// Items successfully appended
    pub items_loaded: usize,
    /// Fetches that failed
    pub failures: usize,
    /// Calls skipped by the loading/exhaustion guard
    pub skipped_calls: usize,
}

impl LoadStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an appended page
    pub fn add_page(&mut self, items: usize) {
        self.pages_loaded += 1;
        self.items_loaded += items;
    }

    /// Record a failed fetch
    pub fn add_failure(&mut self) {
        self.failures += 1;
    }

    /// Record a skipped call
    pub fn add_skipped(&mut self) {
        self.skipped_calls += 1;
    }
}
