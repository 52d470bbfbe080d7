//! Confluence REST API integration.
//!
//! Provides a synchronous HTTP client for the Confluence Cloud REST API
//! with basic authentication and custom request headers, plus the
//! [`Publisher`] that synchronizes converted Markdown documents to pages.

mod client;
mod diagrams;
mod error;
mod publisher;
mod types;

pub use client::ConfluenceClient;
pub use error::ConfluenceError;
pub use publisher::Publisher;
pub use types::{Attachment, Page, Version};
