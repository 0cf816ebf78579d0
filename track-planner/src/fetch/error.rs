//! Upstream refresh error types.

use std::path::PathBuf;

/// Errors that can occur while refreshing timetable data from the metro API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check METRO_API_TOKEN")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status} for {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// Failed to parse response JSON
    #[error("JSON parse error for {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Writing a data file failed
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
