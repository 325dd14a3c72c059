//! Error types for pagefeed
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for pagefeed
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Failed to extract records from path '{path}': {message}")]
    RecordExtraction { path: String, message: String },

    #[error("Fetch failed for page {page}: {message}")]
    Fetch { page: u32, message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a record extraction error
    pub fn record_extraction(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordExtraction {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a fetch error for a specific page
    pub fn fetch(page: u32, message: impl Into<String>) -> Self {
        Self::Fetch {
            page,
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_)
            | Error::RateLimited { .. }
            | Error::Timeout { .. }
            | Error::MaxRetriesExceeded { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Host-surfaceable message for this error
    ///
    /// The controller never hands the error object to its caller; a host
    /// that wants to show copy next to a retry affordance maps the
    /// diagnostic through this instead.
    pub fn user_message(&self) -> String {
        match self {
            Error::HttpStatus { status, .. } => match status {
                400 => "Invalid request".to_string(),
                401 => "Authentication required".to_string(),
                403 => "Access denied".to_string(),
                404 => "Resource not found".to_string(),
                500..=599 => "Server error".to_string(),
                _ => "An error occurred".to_string(),
            },
            Error::Http(_)
            | Error::Timeout { .. }
            | Error::RateLimited { .. }
            | Error::MaxRetriesExceeded { .. } => "Network error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for pagefeed
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::invalid_config("page_size", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'page_size': must be at least 1"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::fetch(3, "connection reset");
        assert_eq!(err.to_string(), "Fetch failed for page 3: connection reset");
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::RateLimited {
            retry_after_seconds: 60
        }
        .is_retryable());
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(429, "").is_retryable());
        assert!(Error::http_status(500, "").is_retryable());
        assert!(Error::http_status(503, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::http_status(401, "").is_retryable());
        assert!(!Error::http_status(404, "").is_retryable());
        assert!(!Error::config("test").is_retryable());
        assert!(!Error::fetch(1, "bad page").is_retryable());
    }

    #[test_case(400, "Invalid request")]
    #[test_case(401, "Authentication required")]
    #[test_case(403, "Access denied")]
    #[test_case(404, "Resource not found")]
    #[test_case(500, "Server error")]
    #[test_case(503, "Server error")]
    #[test_case(418, "An error occurred")]
    fn test_user_message_status_mapping(status: u16, expected: &str) {
        assert_eq!(Error::http_status(status, "").user_message(), expected);
    }

    #[test]
    fn test_user_message_transport() {
        let err = Error::Timeout { timeout_ms: 5000 };
        assert_eq!(err.user_message(), "Network error");

        let err = Error::MaxRetriesExceeded { max_retries: 3 };
        assert_eq!(err.user_message(), "Network error");
    }

    #[test]
    fn test_user_message_fallthrough() {
        let err = Error::fetch(2, "boom");
        assert_eq!(err.user_message(), "Fetch failed for page 2: boom");
    }

    #[test]
    fn test_parse_error_conversions() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::JsonParse(_)));

        let yaml_err = serde_yaml::from_str::<serde_json::Value>(": bad :").unwrap_err();
        let err: Error = yaml_err.into();
        assert!(matches!(err, Error::YamlParse(_)));

        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: Error = anyhow::anyhow!("opaque failure").into();
        assert_eq!(err.to_string(), "opaque failure");
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
