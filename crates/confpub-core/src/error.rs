//! Error types for Markdown conversion.

/// Error during Markdown conversion or local output.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Relative URL that cannot be resolved to a published location.
    #[error("invalid relative URL: {0}")]
    InvalidUrl(String),

    /// I/O error while reading sources or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
