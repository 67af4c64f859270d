//! # croissant-tdml - GeoCroissant to TDML metadata conversion
//!
//! Converts geospatial machine-learning dataset metadata from the
//! GeoCroissant JSON schema (sensor bands, ML task definitions and file
//! listings under `geocr:`-namespaced keys) into a Training Data Markup
//! Language (TDML) document: a flat list of typed entities describing the
//! dataset, its tasks, classes, bands and training-data records.
//!
//! The interesting part is the [`Remapper`]: it locates the relevant
//! sub-structures in a loosely-specified source document, patches missing or
//! malformed fields with documented defaults, and assembles a target
//! document that satisfies the TDML required-field contract. Loading and
//! writing are thin collaborators behind the [`DocumentStore`] capability.
//!
//! ## Quick Start
//!
//! ```rust
//! use croissant_tdml::{RemapConfig, Remapper};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let source = json!({
//!     "name": "hls_burn_scars",
//!     "recordSet": [{"name": "hls_burn_scars"}]
//! });
//!
//! let remapper = Remapper::new(RemapConfig::default());
//! let output = remapper.remap(&source)?;
//!
//! assert_eq!(output.document["name"], "hls_burn_scars");
//! // Absent bands and classes were patched with the canonical defaults
//! assert_eq!(output.document["numberOfClasses"], 3);
//! assert_eq!(output.document["bands"].as_array().unwrap().len(), 6);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

pub mod document;
pub mod error;
pub mod remapper;
pub mod types;

// Re-export commonly used types for convenience
pub use document::{DocumentStore, FileStore};
pub use error::ConvertError;
pub use remapper::Remapper;
pub use types::{BandDescriptor, ClassEntry, RemapConfig, RemapOutput, Warning};

/// Main entry point: load a GeoCroissant document, remap it, persist the
/// TDML result. The store is injected so callers can swap the filesystem
/// out; collected warnings are returned for the caller to report.
///
/// The output file is written only after the full target document has been
/// assembled, so a fatal condition never leaves partial output behind.
pub fn convert<S: DocumentStore>(
    store: &S,
    input: &Path,
    output: &Path,
    config: RemapConfig,
) -> Result<RemapOutput, ConvertError> {
    let source = store.load(input)?;
    let outcome = Remapper::new(config).remap(&source)?;
    store.save(output, &outcome.document)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// In-memory store: the pipeline never touches the filesystem
    struct MemStore {
        docs: RefCell<HashMap<PathBuf, Value>>,
    }

    impl MemStore {
        fn new() -> Self {
            MemStore {
                docs: RefCell::new(HashMap::new()),
            }
        }
    }

    impl DocumentStore for MemStore {
        fn load(&self, path: &Path) -> Result<Value, ConvertError> {
            self.docs
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| ConvertError::NotFound {
                    path: path.to_path_buf(),
                })
        }

        fn save(&self, path: &Path, document: &Value) -> Result<(), ConvertError> {
            self.docs
                .borrow_mut()
                .insert(path.to_path_buf(), document.clone());
            Ok(())
        }
    }

    #[test]
    fn test_convert_pipeline() {
        let store = MemStore::new();
        store
            .save(
                Path::new("in.json"),
                &json!({
                    "name": "hls_burn_scars",
                    "recordSet": [{"name": "hls_burn_scars"}]
                }),
            )
            .unwrap();

        let outcome = convert(
            &store,
            Path::new("in.json"),
            Path::new("out.json"),
            RemapConfig::default(),
        )
        .unwrap();

        let written = store.load(Path::new("out.json")).unwrap();
        assert_eq!(written, outcome.document);
        assert_eq!(written["type"], "EOTrainingDataset");
    }

    #[test]
    fn test_convert_missing_input() {
        let store = MemStore::new();
        let err = convert(
            &store,
            Path::new("absent.json"),
            Path::new("out.json"),
            RemapConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::NotFound { .. }));

        // Nothing was written
        assert!(store.load(Path::new("out.json")).is_err());
    }

    #[test]
    fn test_convert_no_record_set_writes_nothing() {
        let store = MemStore::new();
        store
            .save(Path::new("in.json"), &json!({"name": "empty", "recordSet": []}))
            .unwrap();

        let err = convert(
            &store,
            Path::new("in.json"),
            Path::new("out.json"),
            RemapConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::NoRecordSet));
        assert!(store.load(Path::new("out.json")).is_err());
    }
}
