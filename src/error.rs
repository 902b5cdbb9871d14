//! Error taxonomy for the collection pipeline.
//!
//! Only stage-level failures ([`ConfigError`], [`ExportError::Incomplete`])
//! end a run. Per-request failures ([`FetchError`]) are absorbed by the
//! discovery sweep, and extraction has no error type at all: a candidate
//! that yields no record is simply absent.

use thiserror::Error;

/// Keyword/website configuration could not be loaded or is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config source given (use --config <file> or --demo-config)")]
    Missing,

    #[error("configuration has no usable {0} entries")]
    Empty(&'static str),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A single retrieval attempt (or the whole retry budget) failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request URL {0}")]
    InvalidUrl(String),

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to read response: {0}")]
    Body(#[source] reqwest::Error),

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: usize,
        #[source]
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Whether a fresh attempt could succeed (timeouts and connection failures).
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout(_) | FetchError::Connect(_))
    }

    /// Classify a transport-level `reqwest` error.
    pub fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e)
        } else if e.is_connect() || e.is_request() {
            FetchError::Connect(e)
        } else {
            FetchError::Body(e)
        }
    }
}

/// Failures of the document export stage.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The backend could not be used before anything was written.
    #[error("export backend unavailable: {reason}")]
    Unavailable { reason: String },

    /// Some content was committed before a later write failed.
    #[error(
        "export incomplete: document {document_id} may be malformed after {committed_batches} committed batch(es): {source}"
    )]
    Incomplete {
        document_id: String,
        committed_batches: usize,
        #[source]
        source: Box<ExportError>,
    },

    /// A single backend call failed.
    #[error("export backend error: {0}")]
    Backend(String),
}

impl From<reqwest::Error> for ExportError {
    fn from(e: reqwest::Error) -> Self {
        ExportError::Backend(e.to_string())
    }
}

/// The single terminal failure of a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
