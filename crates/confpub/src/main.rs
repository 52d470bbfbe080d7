//! Publish Markdown files to Confluence.
//!
//! Converts Markdown content into the Confluence Storage Format (XHTML)
//! and either writes the result to local files (`--local`) or uploads
//! pages and attachments through the Confluence REST API.

mod cli;
mod error;
mod headers;
mod output;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use confpub_confluence::{ConfluenceClient, ConfluenceError, Publisher};
use confpub_core::{ConnectionProperties, Processor, RenderingOptions};

use cli::Cli;
use error::CliError;
use output::Output;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_logging(cli.loglevel);

    let mdpath = cli.mdpath.clone();
    let local = cli.local;
    let (options, properties) = cli.into_config();

    let result = if local {
        render_local(&mdpath, options, properties)
    } else {
        publish_remote(&mdpath, options, &properties)
    };

    ExitCode::from(exit_code(result))
}

/// Classify the outcome and report failures: 0 on success, 1 for an API
/// error response (bespoke diagnostics), 2 for everything else.
fn exit_code(result: Result<(), CliError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(CliError::Confluence(ConfluenceError::Api { status, body })) => {
            report_api_failure(status, &body);
            1
        }
        Err(err) => {
            Output::new().error(&format!("Error: {err}"));
            2
        }
    }
}

/// Render to local files; failures propagate unchanged.
fn render_local(
    path: &Path,
    options: RenderingOptions,
    properties: ConnectionProperties,
) -> Result<(), CliError> {
    Processor::new(options, properties).process(path)?;
    Ok(())
}

/// Open a scoped API session and synchronize through it. The session is
/// dropped on every exit path, including failure.
fn publish_remote(
    path: &Path,
    options: RenderingOptions,
    properties: &ConnectionProperties,
) -> Result<(), CliError> {
    let client = ConfluenceClient::connect(properties)?;
    Publisher::new(&client, options).synchronize(path)?;
    Ok(())
}

/// Diagnose a failed API call: log the failure, and the response body too
/// when it decodes as JSON. A non-JSON body is ignored rather than masking
/// the primary error.
fn report_api_failure(status: u16, body: &str) {
    error!("HTTP error: {status}");
    if let Ok(details) = serde_json::from_str::<serde_json::Value>(body) {
        error!("{details}");
    }
}

#[cfg(test)]
mod tests {
    use confpub_core::ConversionError;

    use super::*;

    #[test]
    fn test_exit_code_classification() {
        assert_eq!(exit_code(Ok(())), 0);

        // Only an error response from the API takes the bespoke path.
        let api = CliError::Confluence(ConfluenceError::Api {
            status: 409,
            body: r#"{"message": "conflict"}"#.to_owned(),
        });
        assert_eq!(exit_code(Err(api)), 1);

        let conversion = CliError::Conversion(ConversionError::InvalidUrl("other.md".to_owned()));
        assert_eq!(exit_code(Err(conversion)), 2);

        let config = CliError::Confluence(ConfluenceError::Config(
            "Confluence domain (-d/--domain) not specified".to_owned(),
        ));
        assert_eq!(exit_code(Err(config)), 2);
    }

    #[test]
    fn test_api_failure_body_decoding() {
        // A decodable body parses to the logged value; a non-JSON body is
        // silently skipped. Exercised here to pin the decoding contract.
        let decoded = serde_json::from_str::<serde_json::Value>(r#"{"message": "conflict"}"#);
        assert_eq!(decoded.unwrap()["message"], "conflict");
        assert!(serde_json::from_str::<serde_json::Value>("<html>oops</html>").is_err());

        // Neither body shape may panic the reporter.
        report_api_failure(409, r#"{"message": "conflict"}"#);
        report_api_failure(500, "<html>oops</html>");
    }
}
