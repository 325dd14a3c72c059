//! Trigger coalescing
//!
//! Collapses bursts of trigger calls into a single effective action.
//! Scroll and visibility events arrive in rapid clusters; only the last
//! call in a debounce window should actually run.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default debounce window
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Timer-based trigger coalescer
///
/// Each call schedules its action after the configured delay. A newer
/// call supersedes any call still waiting out its delay; superseded calls
/// are discarded silently. An action that has already started is never
/// interrupted: the debounce operates on trigger calls, not on the work
/// they start.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    /// Create a debouncer with the given window
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Schedule `action` to run after the debounce window
    ///
    /// Supersedes any pending call that has not started yet. Must be
    /// called from within a tokio runtime.
    pub fn call<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let current = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Stale generations lost the window to a newer call
            if generation.load(Ordering::SeqCst) == current {
                action.await;
            }
        });
    }

    /// Discard any pending call without scheduling a new one
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// The configured debounce window
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
