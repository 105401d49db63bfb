use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing profile files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No usable directory could be found for the profile.
    #[error("could not determine a profile directory")]
    NoProfileDir,

    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.into(),
            source,
        }
    }
}

/// Write `contents` to `path`, creating the parent directory first.
pub(crate) fn write_file(path: &std::path::Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
    }
    std::fs::write(path, contents).map_err(|e| StoreError::io(path, e))
}
