//! Loading and persisting JSON documents
//!
//! The conversion pipeline reaches the filesystem only through the
//! [`DocumentStore`] capability, so the remapper can be driven entirely in
//! memory during tests.

use crate::error::ConvertError;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Capability interface for reading and writing JSON documents
pub trait DocumentStore {
    /// Parse the document at `path` into a generic JSON value
    fn load(&self, path: &Path) -> Result<Value, ConvertError>;

    /// Persist `document` at `path` with stable two-space indentation
    fn save(&self, path: &Path, document: &Value) -> Result<(), ConvertError>;
}

/// Filesystem-backed store used by the CLI
pub struct FileStore;

impl DocumentStore for FileStore {
    fn load(&self, path: &Path) -> Result<Value, ConvertError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConvertError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConvertError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        // SIMD parsing first; it mutates its buffer, so hand it a scratch copy
        let mut scratch = bytes.clone();
        if let Ok(value) = simd_json::serde::from_slice::<Value>(&mut scratch) {
            return Ok(value);
        }

        serde_json::from_slice(&bytes).map_err(|e| ConvertError::MalformedInput {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn save(&self, path: &Path, document: &Value) -> Result<(), ConvertError> {
        let json = serde_json::to_string_pretty(document).map_err(|e| ConvertError::WriteFailed {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        fs::write(path, json).map_err(|e| ConvertError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileStore.load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConvertError::NotFound { .. }));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, b"{\"name\": ").unwrap();
        let err = FileStore.load(&path).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput { .. }));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let doc = json!({"name": "HLS_Burn_Scars", "version": "1.0.0"});

        FileStore.save(&path, &doc).unwrap();
        assert_eq!(FileStore.load(&path).unwrap(), doc);

        // Two-space indentation, stable across runs
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"name\""));
    }
}
