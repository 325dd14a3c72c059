//! Debounced feed trigger
//!
//! Hosts wire scroll or visibility events straight to [`FeedTrigger::trigger`];
//! the debouncer collapses each burst into a single `load_more`.

use super::controller::FeedController;
use crate::debounce::Debouncer;

/// Debounced trigger bound to a feed controller
///
/// The last trigger in a debounce window wins; earlier ones are
/// discarded silently. The loading guard in the controller still applies
/// once the debounced call executes, so a trigger landing while a fetch
/// is in flight stays a no-op.
pub struct FeedTrigger<T> {
    controller: FeedController<T>,
    debouncer: Debouncer,
}

impl<T: Send + Sync + 'static> FeedTrigger<T> {
    /// Bind a trigger to a controller, using the controller's debounce window
    pub fn new(controller: FeedController<T>) -> Self {
        let debouncer = Debouncer::new(controller.config().debounce());
        Self {
            controller,
            debouncer,
        }
    }

    /// Schedule a `load_more` after the debounce window
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger(&self) {
        let controller = self.controller.clone();
        self.debouncer.call(async move {
            controller.load_more().await;
        });
    }

    /// Discard a pending trigger, if any
    ///
    /// A teardown aid for hosts unmounting the view; a fetch already in
    /// flight is not affected.
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    /// The bound controller
    pub fn controller(&self) -> &FeedController<T> {
        &self.controller
    }
}

impl<T> Clone for FeedTrigger<T> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            debouncer: self.debouncer.clone(),
        }
    }
}

impl<T> std::fmt::Debug for FeedTrigger<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedTrigger")
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}
