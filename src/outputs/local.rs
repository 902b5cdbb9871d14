//! Local export backend: documents kept in memory and mirrored to Markdown.
//!
//! Each batch is applied to a [`Document`] with the same index rules the
//! remote service enforces, so a cursor mistake fails here too. After every
//! committed batch the Markdown rendering is rewritten to
//! `{dir}/{document_id}.md`.

use super::backend::DocumentService;
use super::document::{DocRequest, Document};
use crate::error::ExportError;
use chrono::Local;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::fs;
use tracing::{debug, info, instrument};

#[derive(Debug)]
pub struct LocalDocStore {
    dir: PathBuf,
    documents: Mutex<HashMap<String, Document>>,
}

impl LocalDocStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            documents: Mutex::new(HashMap::new()),
        }
    }

    fn path_for(&self, document_id: &str) -> PathBuf {
        self.dir.join(format!("{document_id}.md"))
    }

    /// Snapshot of a document, if it exists.
    pub fn document(&self, document_id: &str) -> Option<Document> {
        self.lock().ok()?.get(document_id).cloned()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Document>>, ExportError> {
        self.documents
            .lock()
            .map_err(|_| ExportError::Backend("document store lock poisoned".to_string()))
    }

    /// `news_report_<timestamp>`, suffixed `_2`, `_3`, ... when taken in memory or on disk.
    async fn next_id(&self) -> Result<String, ExportError> {
        let base = format!("news_report_{}", Local::now().format("%Y%m%d_%H%M%S"));
        let mut id = base.clone();
        let mut n = 1;
        loop {
            let known = self.lock()?.contains_key(&id);
            let on_disk = fs::try_exists(self.path_for(&id)).await.unwrap_or(false);
            if !known && !on_disk {
                return Ok(id);
            }
            n += 1;
            id = format!("{base}_{n}");
        }
    }

    async fn write(&self, document_id: &str, document: &Document) -> Result<(), ExportError> {
        let path = self.path_for(document_id);
        fs::write(&path, document.to_markdown())
            .await
            .map_err(|e| ExportError::Backend(format!("writing {}: {e}", path.display())))?;
        debug!(path = %path.display(), "Wrote document");
        Ok(())
    }
}

impl DocumentService for LocalDocStore {
    #[instrument(level = "info", skip(self))]
    async fn create_document(&self, title: &str) -> Result<String, ExportError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ExportError::Backend(format!("creating {}: {e}", self.dir.display())))?;

        let id = self.next_id().await?;
        let document = Document::new(title);
        self.write(&id, &document).await?;
        self.lock()?.insert(id.clone(), document);
        info!(document_id = %id, "Created local document");
        Ok(id)
    }

    #[instrument(level = "debug", skip(self, requests), fields(requests = requests.len()))]
    async fn batch_update(
        &self,
        document_id: &str,
        requests: &[DocRequest],
    ) -> Result<(), ExportError> {
        let mut document = self
            .document(document_id)
            .ok_or_else(|| ExportError::Backend(format!("unknown document {document_id}")))?;
        document.apply_batch(requests)?;
        self.write(document_id, &document).await?;
        self.lock()?.insert(document_id.to_string(), document);
        Ok(())
    }

    fn document_url(&self, document_id: &str) -> String {
        let path = self.path_for(document_id);
        let absolute = std::path::absolute(&path).unwrap_or(path);
        format!("file://{}", absolute.display())
    }
}
