//! Confluence storage format renderer for pulldown-cmark events.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use tracing::warn;

use crate::error::ConversionError;
use crate::options::RenderingOptions;

/// Result of converting a Markdown document.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Confluence XHTML storage format content.
    pub content: String,
    /// Title extracted from the first H1 heading, if any.
    pub title: Option<String>,
    /// Mermaid diagrams awaiting rendering and attachment upload.
    pub diagrams: Vec<PendingDiagram>,
}

/// A Mermaid diagram extracted from the document.
///
/// The content references the diagram as an attachment under `filename`;
/// producing the image from `source` is the caller's responsibility.
#[derive(Clone, Debug)]
pub struct PendingDiagram {
    /// Attachment filename referenced from the page content.
    pub filename: String,
    /// Mermaid diagram source.
    pub source: String,
}

/// Convert a Markdown document to Confluence storage format.
pub fn convert(markdown: &str, options: &RenderingOptions) -> Result<RenderResult, ConversionError> {
    let parser_options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SUPERSCRIPT
        | Options::ENABLE_SUBSCRIPT;
    let parser = Parser::new_ext(markdown, parser_options);
    StorageRenderer::new(options).render(parser)
}

/// Renders pulldown-cmark events to Confluence XHTML storage format.
struct StorageRenderer<'a> {
    options: &'a RenderingOptions,
    output: String,
    /// Level of the heading currently being buffered
    in_heading: Option<HeadingLevel>,
    /// Plain text of the current heading, for titles and anchor slugs
    heading_text: String,
    /// Rendered inline content of the current heading
    heading_html: String,
    title: Option<String>,
    title_extracted: bool,
    in_code_block: bool,
    code_language: Option<String>,
    /// Buffered code block content
    code_text: String,
    in_image: bool,
    diagrams: Vec<PendingDiagram>,
}

impl<'a> StorageRenderer<'a> {
    fn new(options: &'a RenderingOptions) -> Self {
        Self {
            options,
            output: String::with_capacity(4096),
            in_heading: None,
            heading_text: String::new(),
            heading_html: String::new(),
            title: None,
            title_extracted: false,
            in_code_block: false,
            code_language: None,
            code_text: String::new(),
            in_image: false,
            diagrams: Vec::new(),
        }
    }

    /// Render markdown events to Confluence storage format.
    fn render<'e, I>(mut self, events: I) -> Result<RenderResult, ConversionError>
    where
        I: Iterator<Item = Event<'e>>,
    {
        if let Some(banner) = self.options.generated_by.as_deref() {
            write!(
                self.output,
                r#"<ac:structured-macro ac:name="info" ac:schema-version="1"><ac:rich-text-body><p>{}</p></ac:rich-text-body></ac:structured-macro>"#,
                escape_xml(banner)
            )
            .unwrap();
        }
        for event in events {
            self.process_event(event)?;
        }
        Ok(RenderResult {
            content: self.output,
            title: self.title,
            diagrams: self.diagrams,
        })
    }

    /// Current output sink: heading content is buffered so that titles and
    /// anchor slugs are known before the heading element is written.
    fn sink(&mut self) -> &mut String {
        if self.in_heading.is_some() {
            &mut self.heading_html
        } else {
            &mut self.output
        }
    }

    fn process_event(&mut self, event: Event<'_>) -> Result<(), ConversionError> {
        match event {
            Event::Start(tag) => self.start_tag(tag)?,
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.html(&html),
            Event::SoftBreak => self.sink().push('\n'),
            Event::HardBreak => self.sink().push_str("<br />"),
            Event::Rule => self.output.push_str("<hr />"),
            Event::TaskListMarker(checked) => {
                self.sink().push_str(if checked { "[x] " } else { "[ ] " });
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported in Confluence
            }
        }
        Ok(())
    }

    fn start_tag(&mut self, tag: Tag<'_>) -> Result<(), ConversionError> {
        match tag {
            Tag::Paragraph => self.sink().push_str("<p>"),
            Tag::Heading { level, .. } => {
                self.in_heading = Some(level);
                self.heading_text.clear();
                self.heading_html.clear();
            }
            Tag::BlockQuote(_) => {
                self.output.push_str(
                    r#"<ac:structured-macro ac:name="info" ac:schema-version="1"><ac:rich-text-body>"#,
                );
            }
            Tag::CodeBlock(kind) => {
                self.in_code_block = true;
                self.code_text.clear();
                self.code_language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                        lang.split_whitespace().next().map(str::to_owned)
                    }
                    _ => None,
                };
            }
            Tag::List(start) => {
                self.output
                    .push_str(if start.is_some() { "<ol>" } else { "<ul>" });
            }
            Tag::Item => self.output.push_str("<li>"),
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(_) => self.output.push_str("<table><tbody>"),
            Tag::TableHead | Tag::TableRow => self.output.push_str("<tr>"),
            Tag::TableCell => self.output.push_str("<td>"),
            Tag::Emphasis => self.sink().push_str("<em>"),
            Tag::Strong => self.sink().push_str("<strong>"),
            Tag::Strikethrough => self.sink().push_str("<s>"),
            Tag::Superscript => self.sink().push_str("<sup>"),
            Tag::Subscript => self.sink().push_str("<sub>"),
            Tag::Link { dest_url, .. } => {
                self.check_url(&dest_url)?;
                let anchor = format!(r#"<a href="{}">"#, escape_xml(&dest_url));
                self.sink().push_str(&anchor);
            }
            Tag::Image { dest_url, .. } => {
                self.in_image = true;
                // External URLs are referenced directly; local files are
                // assumed to be uploaded as attachments.
                let image = if dest_url.starts_with("http://") || dest_url.starts_with("https://") {
                    format!(
                        r#"<ac:image><ri:url ri:value="{}" /></ac:image>"#,
                        escape_xml(&dest_url)
                    )
                } else {
                    let filename = dest_url.rsplit('/').next().unwrap_or(&dest_url);
                    format!(
                        r#"<ac:image><ri:attachment ri:filename="{}" /></ac:image>"#,
                        escape_xml(filename)
                    )
                };
                self.sink().push_str(&image);
            }
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
        Ok(())
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.sink().push_str("</p>"),
            TagEnd::Heading(level) => self.end_heading(level),
            TagEnd::BlockQuote(_) => {
                self.output
                    .push_str("</ac:rich-text-body></ac:structured-macro>");
            }
            TagEnd::CodeBlock => self.end_code_block(),
            TagEnd::List(ordered) => {
                self.output.push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead | TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => self.output.push_str("</td>"),
            TagEnd::Emphasis => self.sink().push_str("</em>"),
            TagEnd::Strong => self.sink().push_str("</strong>"),
            TagEnd::Strikethrough => self.sink().push_str("</s>"),
            TagEnd::Superscript => self.sink().push_str("</sup>"),
            TagEnd::Subscript => self.sink().push_str("</sub>"),
            TagEnd::Link => self.sink().push_str("</a>"),
            TagEnd::Image => self.in_image = false,
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn end_heading(&mut self, level: HeadingLevel) {
        let html = std::mem::take(&mut self.heading_html);
        let text = std::mem::take(&mut self.heading_text);
        self.in_heading = None;

        // The first H1 becomes the page title and is dropped from the body.
        if level == HeadingLevel::H1 && !self.title_extracted {
            self.title_extracted = true;
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                self.title = Some(trimmed.to_owned());
            }
            return;
        }

        let number = heading_level_to_num(level);
        write!(self.output, "<h{number}>").unwrap();
        if self.options.heading_anchors {
            write!(
                self.output,
                r#"<ac:structured-macro ac:name="anchor" ac:schema-version="1"><ac:parameter ac:name="">{}</ac:parameter></ac:structured-macro>"#,
                heading_slug(&text)
            )
            .unwrap();
        }
        self.output.push_str(&html);
        write!(self.output, "</h{number}>").unwrap();
    }

    fn end_code_block(&mut self) {
        let source = std::mem::take(&mut self.code_text);
        let language = self.code_language.take();
        self.in_code_block = false;

        if language.as_deref() == Some("mermaid") && self.options.render_mermaid {
            let filename = format!(
                "embedded_{}.{}",
                self.diagrams.len() + 1,
                self.options.diagram_output_format.extension()
            );
            write!(
                self.output,
                r#"<ac:image><ri:attachment ri:filename="{filename}" /></ac:image>"#
            )
            .unwrap();
            self.diagrams.push(PendingDiagram { filename, source });
            return;
        }

        self.output
            .push_str(r#"<ac:structured-macro ac:name="code" ac:schema-version="1">"#);
        if let Some(language) = language {
            write!(
                self.output,
                r#"<ac:parameter ac:name="language">{}</ac:parameter>"#,
                escape_xml(&language)
            )
            .unwrap();
        }
        self.output
            .push_str(r#"<ac:parameter ac:name="linenumbers">true</ac:parameter>"#);
        // CDATA content is not escaped
        write!(
            self.output,
            r"<ac:plain-text-body><![CDATA[{source}]]></ac:plain-text-body>"
        )
        .unwrap();
        self.output.push_str("</ac:structured-macro>");
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            self.code_text.push_str(text);
            return;
        }
        if self.in_image {
            // Alt text has no storage format representation.
            return;
        }
        if self.in_heading.is_some() {
            self.heading_text.push_str(text);
        }
        let escaped = escape_xml(text);
        self.sink().push_str(&escaped);
    }

    fn inline_code(&mut self, code: &str) {
        let rendered = format!("<code>{}</code>", escape_xml(code));
        self.sink().push_str(&rendered);
    }

    fn html(&mut self, html: &str) {
        // Pass through HTML as-is
        self.sink().push_str(html);
    }

    /// Relative URLs cannot be resolved without a page catalog; they either
    /// fail the conversion or, with tolerance enabled, pass through with a
    /// warning.
    fn check_url(&self, url: &str) -> Result<(), ConversionError> {
        if is_supported_url(url) {
            return Ok(());
        }
        if self.options.ignore_invalid_url {
            warn!("ignoring relative URL with no published target: {url}");
            return Ok(());
        }
        Err(ConversionError::InvalidUrl(url.to_owned()))
    }
}

fn is_supported_url(url: &str) -> bool {
    url.starts_with('#')
        || url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("mailto:")
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// GitHub-style same-page identifier for a heading.
fn heading_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().chars() {
        if c.is_alphanumeric() || c == '_' || c == '-' {
            slug.extend(c.to_lowercase());
        } else if c == ' ' {
            slug.push('-');
        }
    }
    slug
}

fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
