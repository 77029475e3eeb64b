//! Error types for ticklist JSON store operations.

use std::path::PathBuf;

use thiserror::Error;
use ticklist_core::CollectionError;

/// Errors that can occur during `JsonStore` operations.
#[derive(Error, Debug)]
pub enum JsonStoreError {
    /// Reading or writing the data file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The data file is not a valid task list.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Data file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The data file parsed but breaks collection invariants.
    #[error("corrupt task data in {}: {source}", path.display())]
    Corrupt {
        /// Data file.
        path: PathBuf,
        /// Violated invariant.
        #[source]
        source: CollectionError,
    },

    /// Failed to serialize tasks to JSON.
    #[error("failed to serialize tasks: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Replacing the data file with the freshly written copy failed.
    #[error("failed to replace {}: {source}", path.display())]
    Persist {
        /// Data file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: tempfile::PersistError,
    },
}
