//! Command-line interface definitions for the news collector.
//!
//! Every option can also be supplied through the environment variable named
//! next to it.

use crate::config::ConfigSource;
use crate::dedupe::DEFAULT_SIMILARITY_THRESHOLD;
use crate::error::ConfigError;
use crate::scrapers::discovery::{DiscoveryMode, DiscoverySettings};
use clap::Parser;
use std::time::Duration;

/// Command-line arguments for one collection run.
///
/// # Examples
///
/// ```sh
/// # Demo keyword/website lists, report written as Markdown
/// news_collector --demo-config --output-dir ./reports
///
/// # YAML config, Google Docs export, RSS discovery over 4 workers
/// GOOGLE_DOCS_ACCESS_TOKEN=ya29... news_collector -c sites.yaml --mode rss --workers 4
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// YAML file with `keywords` and `websites` lists
    #[arg(short, long, env = "NEWS_CONFIG", conflicts_with = "demo_config")]
    pub config: Option<String>,

    /// Use the built-in demo keyword and website lists
    #[arg(long)]
    pub demo_config: bool,

    /// How each (website, keyword) pair is searched
    #[arg(long, value_enum, default_value_t = DiscoveryMode::Search)]
    pub mode: DiscoveryMode,

    /// Hosts searched concurrently (requests to one host are always sequential)
    #[arg(short, long, default_value_t = 1)]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Title similarity at or above which two articles are duplicates
    #[arg(long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
    pub similarity_threshold: f64,

    /// Directory for the local Markdown report (used when no access token is given)
    #[arg(short, long, env = "NEWS_OUTPUT_DIR")]
    pub output_dir: Option<String>,

    /// Optional directory for a JSON dump of the run
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Google Docs OAuth access token
    #[arg(long, env = "GOOGLE_DOCS_ACCESS_TOKEN", hide_env_values = true)]
    pub google_access_token: Option<String>,

    /// Google Drive folder the report is moved into
    #[arg(long, env = "OUTPUT_FOLDER_ID")]
    pub output_folder_id: Option<String>,
}

impl Cli {
    pub fn config_source(&self) -> Result<ConfigSource, ConfigError> {
        match (&self.config, self.demo_config) {
            (Some(path), _) => Ok(ConfigSource::File(path.clone())),
            (None, true) => Ok(ConfigSource::Demo),
            (None, false) => Err(ConfigError::Missing),
        }
    }

    pub fn discovery_settings(&self) -> DiscoverySettings {
        DiscoverySettings {
            mode: self.mode,
            timeout: Duration::from_secs(self.timeout_secs),
            workers: self.workers.max(1),
            ..DiscoverySettings::default()
        }
    }
}
