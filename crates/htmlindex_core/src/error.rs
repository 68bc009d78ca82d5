//! Error types for index generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for index generation operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur while generating index files.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Missing template for {id}: {path}")]
    MissingTemplate { id: String, path: PathBuf },

    #[error("Failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load configuration {path}: {message}")]
    ConfigLoad { path: PathBuf, message: String },

    #[error("Failed to generate debug loader: {0:#}")]
    LoaderGeneration(anyhow::Error),

    #[error("Build task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexError {
    /// Whether the error indicates a broken upstream build stage.
    ///
    /// Callers at the process boundary must terminate with a non-zero
    /// status when this returns true.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            IndexError::ManifestRead { .. } | IndexError::ConfigLoad { .. }
        )
    }
}
