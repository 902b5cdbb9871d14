//! # News Collector
//!
//! Searches a configured set of news websites for a configured set of
//! keywords, removes duplicate and near-duplicate results, and composes the
//! survivors into a single report document.
//!
//! ## Usage
//!
//! ```sh
//! news_collector --demo-config --output-dir ./reports
//! news_collector -c sites.yaml -j ./json
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Configuration**: load keyword and website lists (YAML or built-in demo)
//! 2. **Discovery**: search every website with its language's keywords
//! 3. **Deduplication**: URL, exact title, then title similarity
//! 4. **Export**: compose the report through Google Docs or a local Markdown store
//!
//! The export backend is chosen once here; the composer only ever sees an
//! available service or the reason there is none.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dedupe;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use dedupe::Deduplicator;
use outputs::backend::{Backend, ExportTarget};
use outputs::composer::Composer;
use outputs::google_docs::GoogleDocs;
use outputs::json;
use outputs::local::LocalDocStore;
use pipeline::Pipeline;
use scrapers::discovery::Discovery;
use scrapers::fetch::HttpFetcher;
use utils::ensure_writable_dir;

/// Decide the export backend from the command line.
async fn export_target(args: &Cli) -> ExportTarget<Backend> {
    if let Some(token) = args.google_access_token.as_ref().filter(|t| !t.is_empty()) {
        return match GoogleDocs::new(token.clone(), args.output_folder_id.clone()) {
            Ok(docs) => ExportTarget::Available(Backend::Google(docs)),
            Err(e) => ExportTarget::Unavailable {
                reason: e.to_string(),
            },
        };
    }

    if let Some(dir) = &args.output_dir {
        return match ensure_writable_dir(dir).await {
            Ok(()) => ExportTarget::Available(Backend::Local(LocalDocStore::new(dir))),
            Err(e) => {
                error!(path = %dir, error = %e, "Output directory is not writable");
                ExportTarget::Unavailable {
                    reason: format!("output directory {dir} is not writable: {e}"),
                }
            }
        };
    }

    ExportTarget::Unavailable {
        reason: "no Google Docs access token or output directory configured".to_string(),
    }
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_collector starting up");

    let args = Cli::parse();
    debug!(
        ?args.config,
        demo = args.demo_config,
        mode = ?args.mode,
        workers = args.workers,
        "Parsed CLI arguments"
    );

    let source = args.config_source()?;

    // Early check: a JSON dump directory that cannot be written is a setup mistake
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "JSON output directory is not writable");
            return Err(e);
        }
    }

    let target = export_target(&args).await;
    match &target {
        ExportTarget::Available(Backend::Google(_)) => info!("Exporting to Google Docs"),
        ExportTarget::Available(Backend::Local(_)) => info!("Exporting to local Markdown store"),
        ExportTarget::Unavailable { reason } => warn!(%reason, "Export backend unavailable"),
    }

    let settings = args.discovery_settings();
    let fetcher = HttpFetcher::new(settings.timeout)?;
    let pipeline = Pipeline::new(
        source,
        Discovery::new(fetcher, settings),
        Deduplicator::new(args.similarity_threshold),
        Composer::new(target),
    );

    let outcome = pipeline.run().await?;

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_run(&outcome.report, &outcome.articles, dir).await {
            error!(error = %e, "Failed to write JSON run file");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        url = %outcome.report.document_url,
        placeholder = outcome.report.is_placeholder(),
        "Execution complete"
    );
    println!("{}", outcome.report.document_url);

    Ok(())
}
