//! # Pagefeed
//!
//! A minimal, Rust-native toolkit for incremental page loading.
//! Infinite-scroll data feeds, without dragging in a UI framework.
//!
//! ## Features
//!
//! - **Incremental Load Controller**: fixed-size pages, one fetch in
//!   flight, exhaustion latching
//! - **Trigger Coalescing**: debounce bursts of scroll/visibility events
//!   into a single fetch
//! - **Pluggable Sources**: async closures, in-memory collections, a
//!   caching wrapper, or a retrying HTTP fetcher
//! - **Silent Failure Reporting**: fetch errors go to a diagnostic sink,
//!   never to the rendering caller
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagefeed::{FeedConfig, FeedController, SliceFetcher};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let fetcher = Arc::new(SliceFetcher::new((0..42).collect(), 10));
//!     let feed = FeedController::new(FeedConfig::new(10), fetcher);
//!
//!     while feed.has_more().await {
//!         feed.load_more().await;
//!     }
//!
//!     assert_eq!(feed.len().await, 42);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       FeedController                        │
//! │  load_more() → LoadOutcome     items / loading / has_more   │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌────────────┬───────────────┼──────────────┬────────────────┐
//! │  Debounce  │    Fetch      │     Http     │    Monitor     │
//! ├────────────┼───────────────┼──────────────┼────────────────┤
//! │ Coalesce   │ Closure       │ Retry        │ Tracing sink   │
//! │ Cancel     │ In-memory     │ Backoff      │ Collecting     │
//! │            │ Caching       │ Rate limit   │ Init-once      │
//! └────────────┴───────────────┴──────────────┴────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(missing_docs)] // TODO: document error variants before 1.0

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for pagefeed
pub mod error;

/// Common types and type aliases
pub mod types;

/// Trigger coalescing
pub mod debounce;

/// Page sources and the fetch contract
pub mod fetch;

/// The incremental load controller
pub mod feed;

/// HTTP-backed page fetching
pub mod http;

/// Failure reporting and process-wide monitoring
pub mod monitor;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use debounce::Debouncer;
pub use feed::{FeedConfig, FeedController, FeedTrigger, LoadOutcome, LoadPhase};
pub use fetch::{CachingFetcher, FnFetcher, PageFetcher, SliceFetcher};
pub use http::{HttpFetcherConfig, HttpPageFetcher};
pub use monitor::{DiagnosticRecord, ErrorReporter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
