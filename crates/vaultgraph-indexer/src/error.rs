//! Error types for storage access and graph builds

use std::path::PathBuf;

/// Failures reported by a [`DocumentStore`](crate::store::DocumentStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot traverse vault: {0}")]
    Walk(#[from] walkdir::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound(path.display().to_string())
        } else {
            StoreError::Io { path, source }
        }
    }
}

/// A graph build failed; the previously installed snapshot is untouched.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("traversal of {root} failed: {source}")]
    Traversal {
        root: String,
        #[source]
        source: StoreError,
    },
}
