//! Emission errors.

use std::path::PathBuf;

use thiserror::Error;

/// Rendering or writing generated artifacts failed.
#[derive(Debug, Error)]
pub enum EmissionError {
    /// The migration rules could not be embedded as JSON.
    #[error("failed to serialize migration rules: {0}")]
    Rules(#[from] serde_json::Error),
    /// An output directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        /// Directory being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// An artifact could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Reading previously generated output failed.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The output root could not be listed.
    #[error("failed to list {}: {source}", path.display())]
    ListDir {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A generated model file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Walking a generated source tree failed.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}
