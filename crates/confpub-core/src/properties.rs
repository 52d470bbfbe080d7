//! Confluence connection properties.

use std::collections::HashMap;
use std::fmt;

/// Default base path for Confluence Cloud instances.
pub const DEFAULT_BASE_PATH: &str = "/wiki";

/// Connection settings for the Confluence REST API.
///
/// All fields are optional at assembly time; completeness is checked only
/// when a remote session is opened, so local rendering works without any
/// connection settings.
#[derive(Clone, Default)]
pub struct ConnectionProperties {
    /// Confluence organization domain (e.g. `example.atlassian.net`).
    pub domain: Option<String>,
    /// Base path of the Confluence instance (default: `/wiki`).
    pub base_path: Option<String>,
    /// Confluence user name.
    pub username: Option<String>,
    /// Confluence API key.
    pub api_key: Option<String>,
    /// Space key for pages to be published.
    pub space_key: Option<String>,
    /// Custom headers applied to all API requests.
    pub headers: HashMap<String, String>,
}

// Manual Debug so the API key is never echoed in logs or error output.
impl fmt::Debug for ConnectionProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProperties")
            .field("domain", &self.domain)
            .field("base_path", &self.base_path)
            .field("username", &self.username)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("space_key", &self.space_key)
            .field("headers", &self.headers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let properties = ConnectionProperties {
            domain: Some("example.atlassian.net".to_owned()),
            api_key: Some("super-secret-key".to_owned()),
            ..Default::default()
        };
        let printed = format!("{properties:?}");
        assert!(!printed.contains("super-secret-key"));
        assert!(printed.contains("[redacted]"));
    }

    #[test]
    fn test_default_is_empty() {
        let properties = ConnectionProperties::default();
        assert!(properties.domain.is_none());
        assert!(properties.api_key.is_none());
        assert!(properties.headers.is_empty());
    }
}
