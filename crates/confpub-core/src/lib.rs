//! Markdown to Confluence Storage Format conversion.
//!
//! Provides the configuration structures shared by the publishing
//! pipelines, an event-based renderer producing Confluence XHTML storage
//! format from Markdown, and a [`Processor`] that writes the converted
//! output to local files without contacting any remote service.

mod error;
mod options;
mod processor;
mod properties;
mod renderer;

pub use error::ConversionError;
pub use options::{DiagramFormat, RenderingOptions};
pub use processor::{Processor, find_markdown_files};
pub use properties::{ConnectionProperties, DEFAULT_BASE_PATH};
pub use renderer::{PendingDiagram, RenderResult, convert};
