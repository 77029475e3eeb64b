//! JSON file storage for ticklist tasks.

mod error;

pub use error::JsonStoreError;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use ticklist_core::{Task, validate_collection};
use tracing::{debug, info};

/// Storage backed by a single JSON file holding the whole task list.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Use the data file at `path`. Nothing is touched until the first load or save.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every task in file order.
    ///
    /// A missing file is an empty list.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// breaks collection invariants. Existing data is never discarded.
    pub fn load(&self) -> Result<Vec<Task>, JsonStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No data file yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(JsonStoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let tasks: Vec<Task> =
            serde_json::from_str(&contents).map_err(|source| JsonStoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        validate_collection(&tasks).map_err(|source| JsonStoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), count = tasks.len(), "Loaded tasks");
        Ok(tasks)
    }

    /// Replace the file contents with `tasks`.
    ///
    /// The list is written to a temporary file next to the target and renamed
    /// over it, so readers see either the old or the new list.
    ///
    /// # Errors
    /// Returns an error if serialization, writing, or the final rename fails.
    pub fn save(&self, tasks: &[Task]) -> Result<(), JsonStoreError> {
        let mut body = serde_json::to_vec_pretty(tasks).map_err(JsonStoreError::Serialize)?;
        body.push(b'\n');

        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|source| JsonStoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|source| JsonStoreError::Io {
            path: dir.clone(),
            source,
        })?;
        tmp.write_all(&body)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|source| JsonStoreError::Io {
                path: tmp.path().to_path_buf(),
                source,
            })?;
        tmp.persist(&self.path)
            .map_err(|source| JsonStoreError::Persist {
                path: self.path.clone(),
                source,
            })?;

        info!(path = %self.path.display(), count = tasks.len(), "Saved tasks");
        Ok(())
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}
