//! Error types for Confluence integration.

use confpub_core::ConversionError;

/// Error from Confluence API operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// HTTP request failed before a response was received (network error,
    /// timeout, invalid URL).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] ureq::Error),

    /// The server answered with an error status. The body may carry JSON
    /// details suitable for diagnostics.
    #[error("HTTP error: {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Connection settings are incomplete or inconsistent.
    #[error("connection settings incomplete: {0}")]
    Config(String),

    /// I/O error while reading sources.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Markdown conversion error.
    #[error("{0}")]
    Conversion(#[from] ConversionError),
}
