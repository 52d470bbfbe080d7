//! Rendering options derived from the command line.

/// Output format for rendered Mermaid diagrams.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiagramFormat {
    /// Raster output.
    #[default]
    Png,
    /// Vector output.
    Svg,
}

impl DiagramFormat {
    /// File extension for the format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    /// MIME content type for the format.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

/// Options controlling how Markdown documents are converted.
///
/// Created once per invocation and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct RenderingOptions {
    /// Place an anchor at each section heading with GitHub-style
    /// same-page identifiers.
    pub heading_anchors: bool,
    /// Emit a warning but otherwise ignore relative URLs that point to
    /// ill-specified locations.
    pub ignore_invalid_url: bool,
    /// Banner text added to every generated page; `None` disables the
    /// banner entirely.
    pub generated_by: Option<String>,
    /// Page under which new pages are created.
    pub root_page_id: Option<String>,
    /// Render Mermaid diagrams as image attachments instead of inlining
    /// their source.
    pub render_mermaid: bool,
    /// Output format for rendered Mermaid diagrams.
    pub diagram_output_format: DiagramFormat,
    /// Use Confluence Web UI style page links.
    pub webui_links: bool,
}

impl Default for RenderingOptions {
    fn default() -> Self {
        Self {
            heading_anchors: false,
            ignore_invalid_url: false,
            generated_by: None,
            root_page_id: None,
            render_mermaid: true,
            diagram_output_format: DiagramFormat::default(),
            webui_links: false,
        }
    }
}
