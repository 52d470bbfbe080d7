//! Command line argument schema and configuration assembly.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use confpub_core::{ConnectionProperties, DiagramFormat, RenderingOptions};
use tracing_subscriber::EnvFilter;

use crate::headers;

/// Default banner added to generated pages.
const DEFAULT_GENERATED_BY: &str = "This page has been generated with a tool.";

/// Publish Markdown files to Confluence.
///
/// Connection flags fall back to `CONFLUENCE_*` environment variables when
/// not given on the command line.
#[derive(Debug, Parser)]
#[command(name = "confpub", version, about)]
pub(crate) struct Cli {
    /// Path to the Markdown file or directory to convert and publish.
    pub(crate) mdpath: PathBuf,

    /// Confluence organization domain.
    #[arg(short, long, env = "CONFLUENCE_DOMAIN")]
    pub(crate) domain: Option<String>,

    /// Base path for Confluence (default: '/wiki').
    #[arg(short, long, env = "CONFLUENCE_PATH")]
    pub(crate) path: Option<String>,

    /// Confluence user name.
    #[arg(short, long, env = "CONFLUENCE_USER_NAME")]
    pub(crate) username: Option<String>,

    /// Confluence API key. Refer to the documentation how to obtain one.
    #[arg(short, long, env = "CONFLUENCE_API_KEY")]
    pub(crate) apikey: Option<String>,

    /// Confluence space key for pages to be published.
    #[arg(short, long, env = "CONFLUENCE_SPACE_KEY")]
    pub(crate) space: Option<String>,

    /// Log verbosity.
    #[arg(
        short,
        long,
        value_enum,
        ignore_case = true,
        default_value = "info",
        value_name = "LEVEL"
    )]
    pub(crate) loglevel: LogLevel,

    /// Root Confluence page under which new pages are created.
    #[arg(short = 'r', value_name = "ROOT_PAGE")]
    pub(crate) root_page: Option<String>,

    /// Banner text added to every generated page.
    #[arg(
        long,
        default_value = DEFAULT_GENERATED_BY,
        overrides_with = "no_generated_by",
        value_name = "TEXT"
    )]
    pub(crate) generated_by: String,

    /// Do not add the 'generated by a tool' banner to pages.
    #[arg(long, overrides_with = "generated_by")]
    pub(crate) no_generated_by: bool,

    /// Render Mermaid diagrams as image files and add them as attachments.
    #[arg(long, overrides_with = "no_render_mermaid")]
    pub(crate) render_mermaid: bool,

    /// Inline Mermaid diagram sources in the Confluence page.
    #[arg(long, overrides_with = "render_mermaid")]
    pub(crate) no_render_mermaid: bool,

    /// Format for rendered Mermaid diagrams.
    #[arg(long, value_enum, default_value = "png", value_name = "FORMAT")]
    pub(crate) render_mermaid_format: DiagramFormatArg,

    /// Place an anchor at each section heading with GitHub-style same-page
    /// identifiers.
    #[arg(long)]
    pub(crate) heading_anchors: bool,

    /// Emit a warning but otherwise ignore relative URLs that point to
    /// ill-specified locations.
    #[arg(long)]
    pub(crate) ignore_invalid_url: bool,

    /// Write Confluence Storage Format files locally without invoking the
    /// Confluence API.
    #[arg(long)]
    pub(crate) local: bool,

    /// Apply custom headers to all Confluence API requests.
    #[arg(
        long,
        num_args = 0..,
        value_name = "KEY=VALUE",
        value_parser = headers::parse_header
    )]
    pub(crate) headers: Vec<(String, String)>,

    /// Enable Confluence Web UI links. (Typically required for on-prem
    /// versions of Confluence.)
    #[arg(long)]
    pub(crate) webui_links: bool,
}

impl Cli {
    /// Assemble the two derived configuration structures.
    ///
    /// Pure and deterministic: the same arguments always yield identical
    /// options and properties.
    pub(crate) fn into_config(self) -> (RenderingOptions, ConnectionProperties) {
        let options = RenderingOptions {
            heading_anchors: self.heading_anchors,
            ignore_invalid_url: self.ignore_invalid_url,
            generated_by: (!self.no_generated_by).then_some(self.generated_by),
            root_page_id: self.root_page,
            render_mermaid: self.render_mermaid || !self.no_render_mermaid,
            diagram_output_format: self.render_mermaid_format.into(),
            webui_links: self.webui_links,
        };
        let properties = ConnectionProperties {
            domain: self.domain,
            base_path: self.path,
            username: self.username,
            api_key: self.apikey,
            space_key: self.space,
            headers: headers::header_map(self.headers),
        };
        (options, properties)
    }
}

/// Log verbosity levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

impl LogLevel {
    /// Filter directive for the tracing subscriber. `tracing` has no
    /// CRITICAL level, so `critical` maps to `error`.
    fn directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

/// One-time process-wide logging initialization; diagnostics go to stderr.
pub(crate) fn init_logging(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level.directive()))
        .with_writer(std::io::stderr)
        .init();
}

/// Diagram output format argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum DiagramFormatArg {
    Png,
    Svg,
}

impl From<DiagramFormatArg> for DiagramFormat {
    fn from(format: DiagramFormatArg) -> Self {
        match format {
            DiagramFormatArg::Png => Self::Png,
            DiagramFormatArg::Svg => Self::Svg,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("confpub").chain(args.iter().copied())).unwrap()
    }

    fn parse_err(args: &[&str]) -> clap::Error {
        Cli::try_parse_from(std::iter::once("confpub").chain(args.iter().copied())).unwrap_err()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["docs"]);
        assert_eq!(cli.mdpath, PathBuf::from("docs"));
        assert_eq!(cli.loglevel, LogLevel::Info);
        assert_eq!(cli.render_mermaid_format, DiagramFormatArg::Png);
        assert!(!cli.heading_anchors);
        assert!(!cli.ignore_invalid_url);
        assert!(!cli.local);
        assert!(!cli.webui_links);
        assert!(cli.root_page.is_none());
        assert!(cli.headers.is_empty());

        let (options, _) = cli.into_config();
        assert!(options.render_mermaid);
        assert_eq!(options.generated_by.as_deref(), Some(DEFAULT_GENERATED_BY));
    }

    #[test]
    fn test_missing_path_is_rejected() {
        let err = parse_err(&[]);
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_version_flag() {
        let err = parse_err(&["--version"]);
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_render_mermaid_wins_when_last() {
        let cli = parse(&["docs", "--render-mermaid", "--no-render-mermaid"]);
        let (options, _) = cli.into_config();
        assert!(!options.render_mermaid);
    }

    #[test]
    fn test_render_mermaid_wins_when_last() {
        let cli = parse(&["docs", "--no-render-mermaid", "--render-mermaid"]);
        let (options, _) = cli.into_config();
        assert!(options.render_mermaid);
    }

    #[test]
    fn test_no_render_mermaid_alone() {
        let cli = parse(&["docs", "--no-render-mermaid"]);
        let (options, _) = cli.into_config();
        assert!(!options.render_mermaid);
    }

    #[test]
    fn test_no_generated_by_yields_absent_banner() {
        let cli = parse(&["docs", "--no-generated-by"]);
        let (options, _) = cli.into_config();
        assert_eq!(options.generated_by, None);
    }

    #[test]
    fn test_generated_by_custom_text() {
        let cli = parse(&["docs", "--generated-by", "Managed by the docs team."]);
        let (options, _) = cli.into_config();
        assert_eq!(
            options.generated_by.as_deref(),
            Some("Managed by the docs team.")
        );
    }

    #[test]
    fn test_generated_by_wins_when_last() {
        let cli = parse(&["docs", "--no-generated-by", "--generated-by", "Banner"]);
        let (options, _) = cli.into_config();
        assert_eq!(options.generated_by.as_deref(), Some("Banner"));
    }

    #[test]
    fn test_no_generated_by_wins_when_last() {
        let cli = parse(&["docs", "--generated-by", "Banner", "--no-generated-by"]);
        let (options, _) = cli.into_config();
        assert_eq!(options.generated_by, None);
    }

    #[test]
    fn test_loglevel_case_insensitive() {
        let cli = parse(&["docs", "-l", "DEBUG"]);
        assert_eq!(cli.loglevel, LogLevel::Debug);
    }

    #[test]
    fn test_loglevel_rejects_unknown_value() {
        let err = parse_err(&["docs", "--loglevel", "bogus"]);
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_diagram_format_rejects_unknown_value() {
        let err = parse_err(&["docs", "--render-mermaid-format", "gif"]);
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_headers_collected_into_map() {
        let cli = parse(&["docs", "--headers", "X-A=1", "X-B=2", "X-A=3"]);
        let (_, properties) = cli.into_config();
        assert_eq!(properties.headers.len(), 2);
        assert_eq!(properties.headers["X-A"], "3");
        assert_eq!(properties.headers["X-B"], "2");
    }

    #[test]
    fn test_headers_flag_without_tokens() {
        let cli = parse(&["docs", "--headers"]);
        let (_, properties) = cli.into_config();
        assert!(properties.headers.is_empty());
    }

    #[test]
    fn test_malformed_header_rejects_invocation() {
        let err = parse_err(&["docs", "--headers", "X-A=1", "bogus"]);
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_connection_properties_assembly() {
        let cli = parse(&[
            "docs",
            "-d",
            "example.atlassian.net",
            "-p",
            "/wiki",
            "-u",
            "user@example.com",
            "-a",
            "key",
            "-s",
            "DOCS",
        ]);
        let (_, properties) = cli.into_config();
        assert_eq!(properties.domain.as_deref(), Some("example.atlassian.net"));
        assert_eq!(properties.base_path.as_deref(), Some("/wiki"));
        assert_eq!(properties.username.as_deref(), Some("user@example.com"));
        assert_eq!(properties.api_key.as_deref(), Some("key"));
        assert_eq!(properties.space_key.as_deref(), Some("DOCS"));
    }

    #[test]
    fn test_local_flag_selects_local_pipeline() {
        // Local rendering needs no connection settings at all; the remote
        // client is never constructed for this invocation.
        let cli = parse(&["docs", "--local"]);
        assert!(cli.local);
    }

    #[test]
    fn test_root_page_flag() {
        let cli = parse(&["docs", "-r", "123456"]);
        let (options, _) = cli.into_config();
        assert_eq!(options.root_page_id.as_deref(), Some("123456"));
    }

    #[test]
    fn test_critical_maps_to_error_directive() {
        assert_eq!(LogLevel::Critical.directive(), "error");
        assert_eq!(LogLevel::Warn.directive(), "warn");
    }
}
