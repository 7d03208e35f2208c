//! Error types for the catalog pipeline and the query service.
//!
//! Every error here is recoverable at the smallest enclosing unit (page, batch or
//! channel); callers downgrade them to a skip with a log line.

use std::path::PathBuf;

/// Failure talking to the video-platform metadata API.
#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Failure mapping a channel to its uploads collection.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    #[error("channel lookup failed: {0}")]
    Upstream(#[from] PlatformError),
}

/// Failure of one enrichment request. The batch falls back to defaults.
#[derive(thiserror::Error, Debug)]
pub enum EnrichmentError {
    #[error("generation request failed: {0}")]
    Request(#[source] anyhow::Error),

    #[error("unexpected response shape: {0}")]
    Parse(String),
}

/// Failure reading or writing a persisted catalog file.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A structured query that cannot be accepted.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum QueryError {
    #[error("query terms must be a JSON array of strings")]
    NotATermList,

    #[error("too many query terms: {0} (max {1})")]
    TooManyTerms(usize, usize),
}
