//! Page operations for the Confluence API.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::json;
use tracing::info;

use super::{ConfluenceClient, read_checked_json};
use crate::error::ConfluenceError;
use crate::types::{Page, SearchResults};

impl ConfluenceClient {
    /// Look up a page by title within the configured space.
    pub fn find_page_by_title(&self, title: &str) -> Result<Option<Page>, ConfluenceError> {
        let url = format!(
            "{}/content?spaceKey={}&title={}&expand=version",
            self.api_url(),
            encode(self.space_key()),
            encode(title)
        );

        info!("Looking up page \"{}\" in space {}", title, self.space_key());

        let response = self.decorate(self.agent().get(&url)).call()?;
        let results: SearchResults = read_checked_json(response)?;
        Ok(results.results.into_iter().next())
    }

    /// Create a new page under the given parent.
    pub fn create_page(
        &self,
        title: &str,
        body: &str,
        parent_id: &str,
    ) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content", self.api_url());

        let payload = json!({
            "type": "page",
            "title": title,
            "space": {"key": self.space_key()},
            "ancestors": [{"id": parent_id}],
            "body": {
                "storage": {
                    "value": body,
                    "representation": "storage"
                }
            }
        });

        info!("Creating page \"{}\" under {}", title, parent_id);

        let payload_bytes = serde_json::to_vec(&payload)?;
        let response = self
            .decorate(self.agent().post(&url))
            .header("Content-Type", "application/json")
            .send(&payload_bytes[..])?;
        read_checked_json(response)
    }

    /// Update an existing page (auto-increments the version).
    pub fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
    ) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content/{}", self.api_url(), page_id);

        let payload = json!({
            "type": "page",
            "title": title,
            "body": {
                "storage": {
                    "value": body,
                    "representation": "storage"
                }
            },
            "version": {"number": version + 1}
        });

        info!(
            "Updating page {} from version {} to {}",
            page_id,
            version,
            version + 1
        );

        let payload_bytes = serde_json::to_vec(&payload)?;
        let response = self
            .decorate(self.agent().put(&url))
            .header("Content-Type", "application/json")
            .send(&payload_bytes[..])?;
        read_checked_json(response)
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}
