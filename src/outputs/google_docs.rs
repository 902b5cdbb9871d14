//! Google Docs export backend.
//!
//! Uses the Docs REST API directly:
//!
//! | Call | Endpoint |
//! |------|----------|
//! | create | `POST /v1/documents` |
//! | edit | `POST /v1/documents/{id}:batchUpdate` |
//! | move to folder | `PATCH /drive/v3/files/{id}?addParents=...` (Drive) |
//!
//! The OAuth access token is obtained elsewhere and passed in as-is.

use super::backend::DocumentService;
use super::document::DocRequest;
use crate::error::ExportError;
use crate::utils::truncate_for_log;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{info, instrument, warn};

pub const DOCS_API_BASE: &str = "https://docs.googleapis.com";
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedDocument {
    document_id: String,
}

#[derive(Debug, Clone)]
pub struct GoogleDocs {
    client: Client,
    access_token: String,
    folder_id: Option<String>,
    docs_base: String,
    drive_base: String,
}

impl GoogleDocs {
    pub fn new(access_token: String, folder_id: Option<String>) -> Result<Self, ExportError> {
        Self::with_endpoints(access_token, folder_id, DOCS_API_BASE, DRIVE_API_BASE)
    }

    pub fn with_endpoints(
        access_token: String,
        folder_id: Option<String>,
        docs_base: &str,
        drive_base: &str,
    ) -> Result<Self, ExportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ExportError::Unavailable {
                reason: format!("HTTP client setup failed: {e}"),
            })?;
        Ok(Self {
            client,
            access_token,
            folder_id: folder_id.filter(|f| !f.is_empty() && f != "root"),
            docs_base: docs_base.trim_end_matches('/').to_string(),
            drive_base: drive_base.trim_end_matches('/').to_string(),
        })
    }

    async fn check(response: Response) -> Result<Response, ExportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ExportError::Backend(format!(
            "HTTP {status}: {}",
            truncate_for_log(&body, 300)
        )))
    }

    #[instrument(level = "info", skip(self))]
    async fn move_to_folder(&self, document_id: &str, folder_id: &str) {
        let url = format!("{}/drive/v3/files/{document_id}", self.drive_base);
        let result = self
            .client
            .patch(&url)
            .bearer_auth(&self.access_token)
            .query(&[("addParents", folder_id), ("fields", "id, parents")])
            .send()
            .await
            .map_err(ExportError::from);

        match result {
            Ok(response) => match Self::check(response).await {
                Ok(_) => info!("Moved document to output folder"),
                Err(e) => warn!(error = %e, "Could not move document to folder"),
            },
            Err(e) => warn!(error = %e, "Could not move document to folder"),
        }
    }
}

impl DocumentService for GoogleDocs {
    #[instrument(level = "info", skip(self))]
    async fn create_document(&self, title: &str) -> Result<String, ExportError> {
        let url = format!("{}/v1/documents", self.docs_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "title": title }))
            .send()
            .await?;
        let created: CreatedDocument = Self::check(response).await?.json().await?;
        info!(document_id = %created.document_id, "Created document");

        if let Some(folder_id) = &self.folder_id {
            self.move_to_folder(&created.document_id, folder_id).await;
        }
        Ok(created.document_id)
    }

    #[instrument(level = "debug", skip(self, requests), fields(requests = requests.len()))]
    async fn batch_update(
        &self,
        document_id: &str,
        requests: &[DocRequest],
    ) -> Result<(), ExportError> {
        let url = format!("{}/v1/documents/{document_id}:batchUpdate", self.docs_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "requests": requests }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    fn document_url(&self, document_id: &str) -> String {
        format!("https://docs.google.com/document/d/{document_id}/edit")
    }
}
