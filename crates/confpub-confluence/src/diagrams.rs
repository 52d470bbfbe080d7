//! Mermaid rasterization via a Kroki server.

use tracing::debug;
use ureq::Agent;

use confpub_core::DiagramFormat;

use crate::error::ConfluenceError;

/// Public Kroki instance used when no server is configured.
const DEFAULT_KROKI_URL: &str = "https://kroki.io";

/// Kroki server URL, overridable through the environment.
fn server_url() -> String {
    std::env::var("KROKI_URL").unwrap_or_else(|_| DEFAULT_KROKI_URL.to_owned())
}

/// Render a Mermaid diagram to image bytes.
pub(crate) fn render_mermaid(
    agent: &Agent,
    source: &str,
    format: DiagramFormat,
) -> Result<Vec<u8>, ConfluenceError> {
    let url = format!("{}/mermaid/{}", server_url(), format.extension());
    debug!("Rendering Mermaid diagram via {}", url);

    let response = agent
        .post(&url)
        .header("Content-Type", "text/plain")
        .send(source.as_bytes())?;

    let status = response.status().as_u16();
    let mut body = response.into_body();
    if status >= 400 {
        let text = body
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(ConfluenceError::Api { status, body: text });
    }
    Ok(body.read_to_vec()?)
}
