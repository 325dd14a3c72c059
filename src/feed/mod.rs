//! The incremental load controller
//!
//! Drives repeated fetches of a growing list in fixed-size pages.
//!
//! # Overview
//!
//! A [`FeedController`] owns the state behind an infinite-scroll style
//! list: the accumulated items, the next page cursor, a loading flag,
//! and an exhaustion latch. The host constructs it with a page size and
//! a [`crate::fetch::PageFetcher`], calls [`FeedController::load_more`]
//! (or the debounced [`FeedTrigger::trigger`]) whenever the view nears
//! its end, and reads the state back to render.
//!
//! The controller moves through three phases: `Idle` → `Loading` on an
//! accepted call, back to `Idle` when a full page settles (success or
//! failure), and `Loading` → `Exhausted` when a short page arrives.
//! `Exhausted` is terminal.

mod controller;
mod trigger;
mod types;

pub use controller::FeedController;
pub use trigger::FeedTrigger;
pub use types::{FeedConfig, FeedSnapshot, LoadOutcome, LoadPhase, LoadStats};
