//! CLI error types.

use confpub_confluence::ConfluenceError;
use confpub_core::ConversionError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Conversion(#[from] ConversionError),

    #[error("{0}")]
    Confluence(#[from] ConfluenceError),
}
