//! Whole-file JSON persistence for the schedule and snapshot documents.
//!
//! Documents are written to a sibling temporary file and renamed into place,
//! so readers see either the previous document or the new one.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::campaign::ScheduleDocument;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization error for {}: {source}", path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialization error for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DocumentError {
    /// `true` when the document simply does not exist yet.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocumentError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Reads and decodes a JSON document.
///
/// # Errors
///
/// - [`DocumentError::Io`] if the file cannot be read.
/// - [`DocumentError::Deserialize`] if the content does not match `T`.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, DocumentError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DocumentError::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}

/// Encodes `document` as pretty-printed JSON and replaces `path` with it.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// - [`DocumentError::Serialize`] if `document` cannot be encoded.
/// - [`DocumentError::Io`] if the directory, temp file, or rename fails.
pub fn save_document<T: Serialize>(path: &Path, document: &T) -> Result<(), DocumentError> {
    let io_err = |source: std::io::Error| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    };

    let body = serde_json::to_string_pretty(document).map_err(|source| {
        DocumentError::Serialize {
            path: path.to_path_buf(),
            source,
        }
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut file = std::fs::File::create(&tmp_path).map_err(io_err)?;
    file.write_all(body.as_bytes()).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    drop(file);

    std::fs::rename(&tmp_path, path).map_err(io_err)
}

/// Loads the schedule document for window checks.
///
/// Returns `None` when the document is missing or unreadable; callers decide
/// whether that means "assume live" or "no window".
#[must_use]
pub fn read_schedule(path: &Path) -> Option<ScheduleDocument> {
    match load_document::<ScheduleDocument>(path) {
        Ok(doc) => Some(doc),
        Err(e) if e.is_not_found() => {
            tracing::info!(path = %path.display(), "no schedule document yet");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "schedule document unavailable");
            None
        }
    }
}
