//! The document export seam.
//!
//! [`DocumentService`] is what the composer writes through. Which service is
//! used, if any, is decided once at startup and captured in an
//! [`ExportTarget`]; the composer never discovers unavailability lazily.

use super::document::DocRequest;
use super::google_docs::GoogleDocs;
use super::local::LocalDocStore;
use crate::error::ExportError;

/// A backend that can create a document and apply ordered edit batches to it.
pub trait DocumentService {
    /// Create an empty document and return its id.
    async fn create_document(&self, title: &str) -> Result<String, ExportError>;

    /// Apply `requests` in order to the document.
    async fn batch_update(
        &self,
        document_id: &str,
        requests: &[DocRequest],
    ) -> Result<(), ExportError>;

    /// Where a reader can open the document.
    fn document_url(&self, document_id: &str) -> String;
}

/// The export backend chosen at startup.
#[derive(Debug)]
pub enum ExportTarget<S> {
    Available(S),
    Unavailable { reason: String },
}

/// Concrete backends selectable from the command line.
#[derive(Debug)]
pub enum Backend {
    Google(GoogleDocs),
    Local(LocalDocStore),
}

impl DocumentService for Backend {
    async fn create_document(&self, title: &str) -> Result<String, ExportError> {
        match self {
            Backend::Google(docs) => docs.create_document(title).await,
            Backend::Local(store) => store.create_document(title).await,
        }
    }

    async fn batch_update(
        &self,
        document_id: &str,
        requests: &[DocRequest],
    ) -> Result<(), ExportError> {
        match self {
            Backend::Google(docs) => docs.batch_update(document_id, requests).await,
            Backend::Local(store) => store.batch_update(document_id, requests).await,
        }
    }

    fn document_url(&self, document_id: &str) -> String {
        match self {
            Backend::Google(docs) => docs.document_url(document_id),
            Backend::Local(store) => store.document_url(document_id),
        }
    }
}
