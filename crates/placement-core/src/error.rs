use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the placement dashboard crates.
#[derive(Error, Debug)]
pub enum PlacementError {
    /// A dataset file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The dataset file does not exist.
    #[error("Dataset not found: {0}")]
    DatasetNotFound(PathBuf),

    /// The dataset parsed but is not an array of records.
    #[error("Invalid dataset {path}: {reason}")]
    InvalidDataset { path: PathBuf, reason: String },

    /// No dataset with the requested id is registered.
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// A period label does not match the active granularity.
    #[error("Invalid period \"{label}\" for {granularity} granularity")]
    InvalidPeriod { label: String, granularity: String },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the placement crates.
pub type Result<T> = std::result::Result<T, PlacementError>;
