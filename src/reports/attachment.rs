//! Confluence attachment upload
//!
//! Publishes a report file as an attachment of a Confluence page through the
//! `content/{id}/child/attachment` REST endpoint.

use crate::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camino::Utf8Path;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::multipart::{Form, Part};
use url::Url;

const LOG_TARGET: &str = "attachment";

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Confluence refuses attachment uploads without this XSRF opt-out header.
const ATLASSIAN_TOKEN_HEADER: &str = "X-Atlassian-Token";

/// Uploads files as attachments of a single Confluence page.
#[derive(Debug, Clone)]
pub struct AttachmentUploader {
    client: reqwest::Client,
    endpoint: String,
    authorization: HeaderValue,
}

impl AttachmentUploader {
    /// Create an uploader for page `page_id` of the Confluence site at `base_url`.
    pub fn new(base_url: &Url, page_id: &str, username: &str, api_key: &str) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Basic {}", basic_credentials(username, api_key)))?;
        authorization.set_sensitive(true);

        let client = reqwest::Client::builder()
            .user_agent("sonarcloud-report")
            .timeout(UPLOAD_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: attachment_endpoint(base_url, page_id),
            authorization,
        })
    }

    /// Upload the file at `path`, named after its final path component.
    pub async fn upload_file(&self, path: &Utf8Path) -> Result<()> {
        let Some(file_name) = path.file_name() else {
            bail!("'{path}' does not name a file");
        };
        let contents = tokio::fs::read(path)
            .await
            .into_app_err_with(|| format!("reading report file '{path}'"))?;

        self.upload(file_name, contents).await
    }

    /// Upload `contents` as an attachment called `file_name`.
    ///
    /// Succeeds only on a 200 or 201 response.
    pub async fn upload(&self, file_name: &str, contents: Vec<u8>) -> Result<()> {
        let part = Part::bytes(contents).file_name(file_name.to_string()).mime_str("text/csv")?;
        let form = Form::new().part("file", part).text("minorEdit", "true");

        log::info!(target: LOG_TARGET, "Uploading '{file_name}' to {}", self.endpoint);

        let resp = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ATLASSIAN_TOKEN_HEADER, "no-check")
            .multipart(form)
            .send()
            .await
            .into_app_err_with(|| format!("sending '{file_name}' to {}", self.endpoint))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK && status != reqwest::StatusCode::CREATED {
            let body = resp.text().await.unwrap_or_default();
            log::debug!(target: LOG_TARGET, "Upload rejected with body: {body}");
            bail!("failed to upload '{file_name}', status: {status}");
        }

        log::info!(target: LOG_TARGET, "Uploaded '{file_name}' ({status})");
        Ok(())
    }
}

/// `base64(username:api_key)`, the credential part of a Basic authorization header.
fn basic_credentials(username: &str, api_key: &str) -> String {
    STANDARD.encode(format!("{username}:{api_key}"))
}

fn attachment_endpoint(base_url: &Url, page_id: &str) -> String {
    format!(
        "{}/wiki/rest/api/content/{page_id}/child/attachment",
        base_url.as_str().trim_end_matches('/')
    )
}
