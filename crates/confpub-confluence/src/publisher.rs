//! Synchronization of Markdown documents to Confluence pages.

use std::fs;
use std::path::Path;

use tracing::info;

use confpub_core::{RenderResult, RenderingOptions, convert, find_markdown_files};

use crate::client::ConfluenceClient;
use crate::diagrams;
use crate::error::ConfluenceError;
use crate::types::Page;

/// Publishes converted Markdown documents through an open API session.
pub struct Publisher<'a> {
    client: &'a ConfluenceClient,
    options: RenderingOptions,
}

impl<'a> Publisher<'a> {
    /// Create a publisher over an open session.
    #[must_use]
    pub fn new(client: &'a ConfluenceClient, options: RenderingOptions) -> Self {
        Self { client, options }
    }

    /// Synchronize the Markdown file or directory at `path` with Confluence.
    ///
    /// Each document becomes a page in the configured space, matched by
    /// title: existing pages are updated in place, new pages are created
    /// under the configured root page. Mermaid diagrams are rendered and
    /// uploaded as attachments.
    ///
    /// # Errors
    ///
    /// Returns an error when the path cannot be resolved, a document fails
    /// to convert, or an API call fails.
    pub fn synchronize(&self, path: &Path) -> Result<(), ConfluenceError> {
        let path = path.canonicalize()?;
        let files = if path.is_dir() {
            find_markdown_files(&path)?
        } else {
            vec![path]
        };

        for file in &files {
            self.synchronize_document(file)?;
        }
        Ok(())
    }

    fn synchronize_document(&self, file: &Path) -> Result<(), ConfluenceError> {
        info!("Synchronizing {}", file.display());

        let markdown = fs::read_to_string(file)?;
        let document = convert(&markdown, &self.options)?;
        let title = page_title(&document, file);

        let page = self.upsert_page(&title, &document.content)?;

        for diagram in &document.diagrams {
            let image = diagrams::render_mermaid(
                self.client.agent(),
                &diagram.source,
                self.options.diagram_output_format,
            )?;
            let content_type = self.options.diagram_output_format.content_type();
            self.client
                .upload_attachment(&page.id, &diagram.filename, &image, content_type)?;
        }

        info!(
            "Published \"{}\" at {}",
            title,
            self.client.page_url(&page.id, self.options.webui_links)
        );
        Ok(())
    }

    fn upsert_page(&self, title: &str, body: &str) -> Result<Page, ConfluenceError> {
        match self.client.find_page_by_title(title)? {
            Some(existing) => {
                self.client
                    .update_page(&existing.id, title, body, existing.version.number)
            }
            None => {
                let parent = self.options.root_page_id.as_deref().ok_or_else(|| {
                    ConfluenceError::Config(format!(
                        "page \"{title}\" does not exist and no root page was specified (-r)"
                    ))
                })?;
                self.client.create_page(title, body, parent)
            }
        }
    }
}

/// Page title: the document's first H1, or the file stem as fallback.
fn page_title(document: &RenderResult, file: &Path) -> String {
    document.title.clone().unwrap_or_else(|| {
        file.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_owned())
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_page_title_prefers_document_title() {
        let document = RenderResult {
            content: String::new(),
            title: Some("Getting Started".to_owned()),
            diagrams: Vec::new(),
        };
        assert_eq!(
            page_title(&document, Path::new("docs/intro.md")),
            "Getting Started"
        );
    }

    #[test]
    fn test_page_title_falls_back_to_file_stem() {
        let document = RenderResult {
            content: String::new(),
            title: None,
            diagrams: Vec::new(),
        };
        assert_eq!(page_title(&document, Path::new("docs/intro.md")), "intro");
    }
}
