//! Timetable loading errors.

use std::path::PathBuf;

/// Errors from reading the timetable data directory.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A data file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file is not valid timetable JSON
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
