//! Whole-document JSON read/write helpers

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::StoreError;

/// Read a JSON document, returning `None` when the file does not exist
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    debug!(?path, "read_json: called");
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("read_json: file not found");
            return Ok(None);
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let value = serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(value))
}

/// Write a JSON document with 2-space indentation, replacing the file
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    debug!(?path, "write_json: called");
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).map_err(|e| StoreError::io(path, e))
}
