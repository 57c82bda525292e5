//! Custom error types for pubmetrics.
//!
//! This module defines all error types used throughout the application.
//! All functions return `Result<T, PubmetricsError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for pubmetrics operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum PubmetricsError {
    /// Network/transport failure while fetching a page
    #[error("fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("fetch error: HTTP {status} for {url}")]
    Http {
        /// Status code returned by the server
        status: u16,
        /// URL that produced the status
        url: String,
    },

    /// Expected HTML structure absent on a fetched page
    #[error("parse error: {0}")]
    Parse(String),

    /// Ranking page malformed or its impact table empty
    #[error("metrics error: {0}")]
    Metrics(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias using `PubmetricsError`
pub type Result<T> = std::result::Result<T, PubmetricsError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| PubmetricsError::Parse(msg.to_string()))
    }
}
