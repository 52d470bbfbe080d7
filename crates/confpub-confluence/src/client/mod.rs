//! Confluence REST API client.
//!
//! Synchronous HTTP client for the Confluence Cloud REST API with basic
//! authentication. Custom headers from the connection properties are
//! applied to every request.

mod attachments;
mod pages;

use std::collections::HashMap;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use ureq::Agent;

use confpub_core::{ConnectionProperties, DEFAULT_BASE_PATH};

use crate::error::ConfluenceError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Confluence REST API client.
///
/// The client is a scoped session handle: it owns the HTTP agent and is
/// released when dropped, on every exit path.
pub struct ConfluenceClient {
    agent: Agent,
    /// Site URL without trailing slash, e.g. `https://example.atlassian.net/wiki`.
    site_url: String,
    space_key: String,
    auth_header: String,
    extra_headers: HashMap<String, String>,
}

impl ConfluenceClient {
    /// Open a session from connection properties.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::Config`] when a required connection
    /// setting is missing.
    pub fn connect(properties: &ConnectionProperties) -> Result<Self, ConfluenceError> {
        let domain = require(properties.domain.as_deref(), "domain (-d/--domain)")?;
        let username = require(properties.username.as_deref(), "user name (-u/--username)")?;
        let api_key = require(properties.api_key.as_deref(), "API key (-a/--apikey)")?;
        let space_key = require(properties.space_key.as_deref(), "space key (-s/--space)")?;

        let base_path = properties.base_path.as_deref().unwrap_or(DEFAULT_BASE_PATH);
        let base_path = format!("/{}", base_path.trim_matches('/'));
        let site_url = format!("https://{}{}", domain.trim_end_matches('/'), base_path);

        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            agent,
            site_url: site_url.trim_end_matches('/').to_owned(),
            space_key: space_key.to_owned(),
            auth_header: format!("Basic {}", STANDARD.encode(format!("{username}:{api_key}"))),
            extra_headers: properties.headers.clone(),
        })
    }

    /// The REST API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.site_url)
    }

    /// Space key pages are published into.
    pub fn space_key(&self) -> &str {
        &self.space_key
    }

    pub(crate) fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Web address of a page, in modern or Web UI style.
    #[must_use]
    pub fn page_url(&self, page_id: &str, webui_links: bool) -> String {
        if webui_links {
            format!("{}/pages/viewpage.action?pageId={page_id}", self.site_url)
        } else {
            format!("{}/spaces/{}/pages/{page_id}", self.site_url, self.space_key)
        }
    }

    /// Apply authentication and the custom headers to a request.
    fn decorate<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        let mut request = request
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json");
        for (name, value) in &self.extra_headers {
            request = request.header(name, value);
        }
        request
    }
}

fn require<'a>(value: Option<&'a str>, what: &str) -> Result<&'a str, ConfluenceError> {
    value.ok_or_else(|| ConfluenceError::Config(format!("Confluence {what} not specified")))
}

/// Turn an error status into [`ConfluenceError::Api`], or decode the body.
pub(crate) fn read_checked_json<T: DeserializeOwned>(
    response: ureq::http::Response<ureq::Body>,
) -> Result<T, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();
    if status >= 400 {
        let text = body
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(ConfluenceError::Api { status, body: text });
    }
    Ok(body.read_json()?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn properties() -> ConnectionProperties {
        ConnectionProperties {
            domain: Some("example.atlassian.net".to_owned()),
            username: Some("user@example.com".to_owned()),
            api_key: Some("key".to_owned()),
            space_key: Some("DOCS".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_connect_builds_site_url_with_default_base_path() {
        let client = ConfluenceClient::connect(&properties()).unwrap();
        assert_eq!(client.api_url(), "https://example.atlassian.net/wiki/rest/api");
    }

    #[test]
    fn test_connect_normalizes_base_path() {
        let client = ConfluenceClient::connect(&ConnectionProperties {
            base_path: Some("confluence/".to_owned()),
            ..properties()
        })
        .unwrap();
        assert_eq!(
            client.api_url(),
            "https://example.atlassian.net/confluence/rest/api"
        );
    }

    #[test]
    fn test_connect_requires_domain() {
        let result = ConfluenceClient::connect(&ConnectionProperties {
            domain: None,
            ..properties()
        });
        assert!(matches!(result, Err(ConfluenceError::Config(msg)) if msg.contains("domain")));
    }

    #[test]
    fn test_connect_requires_credentials() {
        let result = ConfluenceClient::connect(&ConnectionProperties {
            api_key: None,
            ..properties()
        });
        assert!(matches!(result, Err(ConfluenceError::Config(msg)) if msg.contains("API key")));
    }

    #[test]
    fn test_page_url_styles() {
        let client = ConfluenceClient::connect(&properties()).unwrap();
        assert_eq!(
            client.page_url("123", false),
            "https://example.atlassian.net/wiki/spaces/DOCS/pages/123"
        );
        assert_eq!(
            client.page_url("123", true),
            "https://example.atlassian.net/wiki/pages/viewpage.action?pageId=123"
        );
    }
}
