//! Confluence API response types.

use serde::Deserialize;

/// Confluence page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Page title.
    pub title: String,
    /// Version information.
    pub version: Version,
}

/// Page version.
#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
}

/// Result page of a content search.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResults {
    pub results: Vec<Page>,
}

/// Page attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    /// Attachment ID.
    pub id: String,
    /// Attachment filename.
    pub title: String,
}

/// Attachment listing response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AttachmentsResponse {
    pub results: Vec<Attachment>,
}
