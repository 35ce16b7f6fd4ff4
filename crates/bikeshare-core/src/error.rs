use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the bikeshare explorer.
#[derive(Error, Debug)]
pub enum ExploreError {
    /// The requested city has no registered dataset.
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    /// A dataset file could not be opened or read from disk.
    #[error("Failed to read dataset {path}: {source}")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be parsed. The whole load is aborted; no partial
    /// dataset is ever returned.
    #[error("Malformed record at {path}:{line}: {message}")]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// A required column is absent from the dataset header row.
    #[error("Dataset {path} is missing required column \"{column}\"")]
    MissingColumn { path: PathBuf, column: String },

    /// An aggregation was requested over zero records.
    #[error("No trips match the requested filters")]
    EmptyDataset,

    /// Pass-through for raw I/O errors that do not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the bikeshare crates.
pub type Result<T> = std::result::Result<T, ExploreError>;
