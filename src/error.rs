//! Error types for the library seams.
//!
//! Application edges (config loading, the binary) use `anyhow::Result`; the
//! store and the search client return these typed errors so the search
//! handler can pick a fallback per failure site.

use thiserror::Error;

/// Failures of the persistent key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store worker is no longer running")]
    WorkerGone,
}

/// Failures of the remote video search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search response is not valid JSON: {0}")]
    Decode(String),

    /// The body parsed, but `items` is missing or not an array
    #[error("Unexpected API response: {0}")]
    UnexpectedShape(String),

    #[error("YOUTUBE_API_KEY is not configured")]
    MissingApiKey,
}
