//! Local rendering of Markdown documents to Confluence Storage Format files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ConversionError;
use crate::options::RenderingOptions;
use crate::properties::ConnectionProperties;
use crate::renderer::convert;

/// Converts Markdown documents and writes the results to local files,
/// without contacting any remote service.
///
/// Each `<name>.md` input produces a sibling `<name>.csf` file with the
/// page content in Confluence storage format. Mermaid diagram sources are
/// written next to the output as `<name>_embedded_<n>.mmd`; rasterizing them is
/// left to an external tool.
pub struct Processor {
    options: RenderingOptions,
    properties: ConnectionProperties,
}

impl Processor {
    /// Create a new processor.
    #[must_use]
    pub fn new(options: RenderingOptions, properties: ConnectionProperties) -> Self {
        Self {
            options,
            properties,
        }
    }

    /// Convert the Markdown file or directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved, a source cannot be
    /// read, a document fails to convert, or output cannot be written.
    pub fn process(&self, path: &Path) -> Result<(), ConversionError> {
        let path = path.canonicalize()?;
        debug!(
            space = ?self.properties.space_key,
            "rendering locally, the Confluence API will not be contacted"
        );

        if path.is_dir() {
            for file in find_markdown_files(&path)? {
                self.process_file(&file)?;
            }
        } else {
            self.process_file(&path)?;
        }
        Ok(())
    }

    fn process_file(&self, file: &Path) -> Result<(), ConversionError> {
        let markdown = fs::read_to_string(file)?;
        let document = convert(&markdown, &self.options)?;

        let target = file.with_extension("csf");
        fs::write(&target, &document.content)?;
        info!("generated {}", target.display());

        let parent = file.parent().unwrap_or_else(|| Path::new("."));
        // Prefix diagram sources with the document stem so documents in the
        // same directory cannot overwrite each other's output.
        let stem = file
            .file_stem()
            .map_or_else(|| "page".to_owned(), |s| s.to_string_lossy().into_owned());
        for diagram in &document.diagrams {
            let source_name = Path::new(&diagram.filename).with_extension("mmd");
            let target = parent.join(format!("{stem}_{}", source_name.display()));
            fs::write(target, &diagram.source)?;
        }
        Ok(())
    }
}

/// Recursively collect `*.md` files under `root`, sorted for determinism.
pub fn find_markdown_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_markdown(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_markdown(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_markdown(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    Ok(())
}
