//! Attachment operations for the Confluence API.

use rand::RngExt;
use tracing::info;

use super::{ConfluenceClient, read_checked_json};
use crate::error::ConfluenceError;
use crate::types::{Attachment, AttachmentsResponse};

impl ConfluenceClient {
    /// Upload or update an attachment (upsert by filename).
    pub fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        let existing = self.find_attachment_by_name(page_id, filename)?;

        let url = if let Some(ref attachment) = existing {
            info!(
                "Updating existing attachment '{}' (id={})",
                filename, attachment.id
            );
            format!(
                "{}/content/{}/child/attachment/{}/data",
                self.api_url(),
                page_id,
                attachment.id
            )
        } else {
            info!("Uploading new attachment '{}' to page {}", filename, page_id);
            format!("{}/content/{}/child/attachment", self.api_url(), page_id)
        };

        let boundary = format!("----ConfpubFormBoundary{:016x}", rand::rng().random::<u64>());
        let body = multipart_file(&boundary, filename, content_type, data);

        let response = self
            .decorate(self.agent().post(&url))
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .header("X-Atlassian-Token", "nocheck")
            .send(&body[..])?;

        // Response is a list for new uploads, single object for updates
        if existing.is_some() {
            read_checked_json(response)
        } else {
            let uploaded: AttachmentsResponse = read_checked_json(response)?;
            uploaded
                .results
                .into_iter()
                .next()
                .ok_or_else(|| ConfluenceError::Api {
                    status: 200,
                    body: "Empty attachment response".to_owned(),
                })
        }
    }

    /// Find an attachment on a page by filename.
    fn find_attachment_by_name(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Option<Attachment>, ConfluenceError> {
        let url = format!("{}/content/{}/child/attachment", self.api_url(), page_id);

        let response = self.decorate(self.agent().get(&url)).call()?;
        let attachments: AttachmentsResponse = read_checked_json(response)?;
        Ok(attachments
            .results
            .into_iter()
            .find(|attachment| attachment.title == filename))
    }
}

/// Build a single-file multipart/form-data body.
fn multipart_file(boundary: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
