//! Report composition: the unique article set as one formatted document.
//!
//! The whole document is planned up front as ordered batches of
//! [`DocRequest`]s whose indices come from a single forward-only
//! [`Cursor`]. The plan is then submitted batch by batch:
//!
//! 1. Header: title line, generated-at line, article count
//! 2. One batch per language (sorted by tag): a banner, then for each
//!    article its numbered title, source website, linked URL, summary and
//!    a separator
//!
//! # Failure policy
//!
//! - Backend unavailable at startup, or document creation fails: nothing
//!   was written, so a labelled placeholder is returned instead
//! - Any batch fails after the document exists: [`ExportError::Incomplete`],
//!   since the document may be partially written

use super::backend::{DocumentService, ExportTarget};
use super::document::{Cursor, DocRequest};
use crate::error::ExportError;
use crate::models::RawArticle;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use tracing::{error, info, instrument, warn};

/// URLs at least this long are shortened for display.
const URL_DISPLAY_CHARS: usize = 60;
const URL_DISPLAY_KEEP: usize = 57;
const RULE_WIDTH: usize = 80;

/// Result of a successful compose call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported { document_id: String, url: String },
    /// The backend could not be used; nothing was written.
    Placeholder { url: String, reason: String },
}

impl ExportOutcome {
    pub fn url(&self) -> &str {
        match self {
            ExportOutcome::Exported { url, .. } | ExportOutcome::Placeholder { url, .. } => url,
        }
    }
}

/// A fully planned document: its title and the batches that write it.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPlan {
    pub title: String,
    pub batches: Vec<Vec<DocRequest>>,
    /// Cursor position after the last planned insertion.
    pub end_offset: usize,
}

/// Display form of a URL: unchanged below 60 characters, else cut to 57 plus `...`.
pub fn display_url(url: &str) -> String {
    if url.chars().count() < URL_DISPLAY_CHARS {
        url.to_string()
    } else {
        let head: String = url.chars().take(URL_DISPLAY_KEEP).collect();
        format!("{head}...")
    }
}

pub fn document_title(now: &DateTime<Local>) -> String {
    format!("News Report - {}", now.format("%Y-%m-%d %H:%M:%S"))
}

pub fn placeholder_url(now: &DateTime<Local>) -> String {
    format!(
        "https://docs.google.com/document/d/demo_{}/edit",
        now.format("%Y%m%d_%H%M%S")
    )
}

fn language_banner(language: &str, count: usize) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "\n{rule}\n{} NEWS ({count} articles)\n{rule}\n\n",
        language.to_uppercase()
    )
}

fn separator() -> String {
    format!("\n{}\n\n", "-".repeat(RULE_WIDTH))
}

/// Plan every insertion for `articles`, in write order.
pub fn plan_document(articles: &[RawArticle], now: &DateTime<Local>) -> DocumentPlan {
    let mut cursor = Cursor::default();
    let mut batches = Vec::new();

    let generated = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let mut header = Vec::new();
    cursor.insert(&mut header, "News Monitoring Report\n");
    cursor.insert(&mut header, &format!("Generated: {generated}\n"));
    cursor.insert(&mut header, &format!("Total Articles: {}\n\n", articles.len()));
    batches.push(header);

    let mut by_language: BTreeMap<&str, Vec<&RawArticle>> = BTreeMap::new();
    for article in articles {
        by_language
            .entry(article.language.as_str())
            .or_default()
            .push(article);
    }

    for (language, group) in by_language {
        let mut section = Vec::new();
        cursor.insert(&mut section, &language_banner(language, group.len()));

        for (i, article) in group.iter().enumerate() {
            cursor.insert(&mut section, &format!("{}. {}\n", i + 1, article.title));
            cursor.insert(&mut section, &format!("Website: {}\n", article.website));

            if !article.url.is_empty() {
                cursor.insert(&mut section, "Read More: ");
                let shown = cursor.insert(&mut section, &display_url(&article.url));
                section.push(DocRequest::link(shown, &article.url));
                cursor.insert(&mut section, "\n");
            }
            if !article.summary.is_empty() {
                cursor.insert(&mut section, &format!("Summary: {}\n", article.summary));
            }
            cursor.insert(&mut section, &separator());
        }
        batches.push(section);
    }

    DocumentPlan {
        title: document_title(now),
        batches,
        end_offset: cursor.offset(),
    }
}

/// Writes the report through the export target chosen at startup.
#[derive(Debug)]
pub struct Composer<S> {
    target: ExportTarget<S>,
}

impl<S> Composer<S>
where
    S: DocumentService,
{
    pub fn new(target: ExportTarget<S>) -> Self {
        Self { target }
    }

    /// Compose and export `articles`.
    #[instrument(level = "info", skip_all, fields(articles = articles.len()))]
    pub async fn compose(&self, articles: &[RawArticle]) -> Result<ExportOutcome, ExportError> {
        let now = Local::now();

        let service = match &self.target {
            ExportTarget::Available(service) => service,
            ExportTarget::Unavailable { reason } => {
                return Ok(Self::placeholder(&now, reason.clone()));
            }
        };

        let plan = plan_document(articles, &now);
        let document_id = match service.create_document(&plan.title).await {
            Ok(id) => id,
            Err(e) => return Ok(Self::placeholder(&now, e.to_string())),
        };

        for (committed, batch) in plan.batches.iter().enumerate() {
            if let Err(e) = service.batch_update(&document_id, batch).await {
                error!(
                    %document_id,
                    committed_batches = committed,
                    error = %e,
                    "Document write failed part-way"
                );
                return Err(ExportError::Incomplete {
                    document_id,
                    committed_batches: committed,
                    source: Box::new(e),
                });
            }
        }

        let url = service.document_url(&document_id);
        info!(
            %document_id,
            %url,
            batches = plan.batches.len(),
            length = plan.end_offset - 1,
            "Document exported"
        );
        Ok(ExportOutcome::Exported { document_id, url })
    }

    fn placeholder(now: &DateTime<Local>, reason: String) -> ExportOutcome {
        let url = placeholder_url(now);
        warn!(%reason, %url, "Export backend unavailable; returning placeholder");
        ExportOutcome::Placeholder { url, reason }
    }
}
