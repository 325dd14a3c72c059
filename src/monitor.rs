//! Failure reporting and process-wide monitoring
//!
//! Fetch failures never surface to the rendering caller; they land here
//! as diagnostic records instead. The default sink logs through
//! `tracing`; embedders with their own error pipeline plug in a custom
//! [`ErrorReporter`].
//!
//! Subscriber installation (`init_monitoring`) is a process-lifecycle
//! concern: call it once at startup, typically gated to production via
//! [`MonitorConfig::from_env`].

use crate::error::Error;
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::error;

// ============================================================================
// Diagnostic records
// ============================================================================

/// Diagnostic record emitted when a page fetch fails
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticRecord {
    /// Page whose fetch failed
    pub page: u32,
    /// Error detail
    pub detail: String,
    /// Whether the failure class is worth retrying
    pub retryable: bool,
    /// When the failure was observed
    pub occurred_at: DateTime<Utc>,
}

impl DiagnosticRecord {
    /// Build a record from the failed page and its error
    pub fn new(page: u32, error: &Error) -> Self {
        Self {
            page,
            detail: error.to_string(),
            retryable: error.is_retryable(),
            occurred_at: Utc::now(),
        }
    }
}

// ============================================================================
// Reporters
// ============================================================================

/// Sink for fetch-failure diagnostics
pub trait ErrorReporter: Send + Sync {
    /// Deliver one diagnostic record
    fn report(&self, record: &DiagnosticRecord);
}

/// Reports through `tracing` (the default sink)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, record: &DiagnosticRecord) {
        error!(
            page = record.page,
            retryable = record.retryable,
            detail = %record.detail,
            "page fetch failed"
        );
    }
}

/// Discards all reports
///
/// For embedders that capture failures at their own boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ErrorReporter for NullReporter {
    fn report(&self, _record: &DiagnosticRecord) {}
}

/// Buffers reports for later inspection
#[derive(Debug, Default)]
pub struct CollectingReporter {
    records: Mutex<Vec<DiagnosticRecord>>,
}

impl CollectingReporter {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records.lock().expect("reporter lock poisoned").clone()
    }

    /// Number of records collected
    pub fn len(&self) -> usize {
        self.records.lock().expect("reporter lock poisoned").len()
    }

    /// Check if nothing has been reported
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, record: &DiagnosticRecord) {
        self.records
            .lock()
            .expect("reporter lock poisoned")
            .push(record.clone());
    }
}

// ============================================================================
// Process-wide initialization
// ============================================================================

/// Monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Whether to install the subscriber at all
    pub enabled: bool,
    /// Extra filter directive, e.g. `"pagefeed=debug"`
    pub filter: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            filter: None,
        }
    }
}

impl MonitorConfig {
    /// Production-gated config from the environment
    ///
    /// Enabled only when `APP_ENV` is `production`.
    pub fn from_env() -> Self {
        let enabled = std::env::var("APP_ENV").is_ok_and(|v| v == "production");
        Self {
            enabled,
            filter: None,
        }
    }
}

static MONITOR: OnceCell<bool> = OnceCell::new();

/// Install the process-wide tracing subscriber, at most once
///
/// Returns true if this call installed it. Later calls (from any thread)
/// are no-ops, as is the whole function when the config is disabled or
/// another subscriber is already registered.
pub fn init_monitoring(config: &MonitorConfig) -> bool {
    *MONITOR.get_or_init(|| {
        if !config.enabled {
            return false;
        }

        let mut filter = tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::INFO.into());
        if let Some(directive) = config.filter.as_ref().and_then(|d| d.parse().ok()) {
            filter = filter.add_directive(directive);
        }

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    })
}
