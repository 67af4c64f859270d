use std::path::PathBuf;
use thiserror::Error;

/// Fatal conversion failures
///
/// Only these conditions abort a conversion. Everything else the remapper
/// can recover from is reported as a [`Warning`](crate::types::Warning)
/// and patched with a documented default.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source path does not resolve to a file
    #[error("source file not found: {path}")]
    NotFound { path: PathBuf },

    /// The source file exists but could not be read
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source bytes are not valid JSON
    #[error("invalid JSON in {path}: {source}")]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The source document has no record set to anchor the conversion on
    #[error("no recordSet entries found in source document")]
    NoRecordSet,

    /// The assembled document could not be persisted
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
