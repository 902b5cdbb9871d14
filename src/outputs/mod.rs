//! Output stages: the composed report document and the JSON run dump.
//!
//! # Submodules
//!
//! - [`document`]: edit requests, the offset cursor, and an in-memory document model
//! - [`backend`]: the [`backend::DocumentService`] seam and the startup [`backend::ExportTarget`]
//! - [`google_docs`]: Google Docs REST backend
//! - [`local`]: Markdown-on-disk backend
//! - [`composer`]: plans and submits the report document
//! - [`json`]: writes the unique article set and run report as JSON
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── news_report_20250506_143000.md   # local backend
//!
//! json_output_dir/
//! └── 2025-05-06/
//!     └── 143000.json
//! ```

pub mod backend;
pub mod composer;
pub mod document;
pub mod google_docs;
pub mod json;
pub mod local;
