//! JSON dump of a run.
//!
//! The unique article set is written together with the run report, one file
//! per run, grouped by local date:
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── 091500.json
//!     └── 143000.json
//! ```

use crate::models::{RawArticle, RunReport};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Serialize)]
struct RunDump<'a> {
    generated_at: String,
    report: &'a RunReport,
    articles: &'a [RawArticle],
}

/// Path of the dump for a run finished at `now`.
pub fn dump_path(json_output_dir: &str, now: &DateTime<Local>) -> PathBuf {
    PathBuf::from(json_output_dir)
        .join(now.format("%Y-%m-%d").to_string())
        .join(format!("{}.json", now.format("%H%M%S")))
}

/// Write `report` and `articles` under `{json_output_dir}/{date}/{HHMMSS}.json`.
///
/// Returns the written path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_run(
    report: &RunReport,
    articles: &[RawArticle],
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let now = Local::now();
    let dump = RunDump {
        generated_at: now.to_rfc3339(),
        report,
        articles,
    };
    let json = serde_json::to_string_pretty(&dump)?;

    let path = dump_path(json_output_dir, &now);
    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = articles.len(), "Wrote JSON run file");
    Ok(path)
}
