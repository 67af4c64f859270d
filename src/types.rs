use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Describes one spectral channel of the source sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandDescriptor {
    pub name: String,
    pub description: String,
    pub wavelength: String,
    #[serde(rename = "hlsBand")]
    pub hls_band: String,
}

impl BandDescriptor {
    /// Build a descriptor; the description is derived from name and HLS band
    pub fn new(
        name: impl Into<String>,
        wavelength: impl Into<String>,
        hls_band: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let hls_band = hls_band.into();
        let description = format!("{} band ({})", name, hls_band);
        BandDescriptor {
            name,
            description,
            wavelength: wavelength.into(),
            hls_band,
        }
    }
}

/// Pairs a label id with its human-readable class name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub key: String,
    pub value: String,
}

impl ClassEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        ClassEntry {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Where band metadata lives in a source document, resolved once per
/// conversion. The top-level sensor object wins over the record-set field.
#[derive(Debug, Clone, Copy)]
pub enum BandSource<'a> {
    /// Top-level `geocr:sensorCharacteristics[0].bandConfiguration`
    SensorCharacteristics(&'a Map<String, Value>),
    /// `geocr:bandConfiguration` on an image field of the main record set
    RecordSetField(&'a Map<String, Value>),
}

/// Where class metadata lives in a source document, resolved once per
/// conversion. The top-level ML-task object wins over the record-set field.
#[derive(Debug, Clone, Copy)]
pub enum ClassSource<'a> {
    /// Top-level `geocr:mlTask.classes`
    MlTask(&'a [Value]),
    /// `geocr:classValues` on an annotation field of the main record set
    RecordSetField(&'a Map<String, Value>),
}

/// A recoverable condition found during remapping. The conversion proceeds
/// with a documented default; callers decide how to report these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// An optional source field was absent or empty; its default was used
    MissingField { field: &'static str },
    /// No record set matched the sentinel or marker; the first entry was used
    RecordSetFallback { name: String },
    /// No band configuration anywhere; canonical HLS bands substituted
    DefaultBands,
    /// No class configuration anywhere; canonical classes substituted
    DefaultClasses,
    /// The source carries no usable image/annotation file listing
    EmptyFileListing,
    /// An image/annotation pair with a missing URL was skipped
    SkippedPair { index: usize },
    /// Required target fields still empty after fallback resolution
    MissingRequired { fields: Vec<String> },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingField { field } => {
                write!(f, "no '{}' in source, using default", field)
            }
            Warning::RecordSetFallback { name } => {
                write!(f, "using first record set '{}' as main record set", name)
            }
            Warning::DefaultBands => {
                write!(f, "no bands found in source, using default HLS bands")
            }
            Warning::DefaultClasses => {
                write!(f, "no classes found in source, using default burn scar classes")
            }
            Warning::EmptyFileListing => {
                write!(f, "no image-annotation pairs found in file listing")
            }
            Warning::SkippedPair { index } => {
                write!(f, "skipping data entry {} due to missing URL", index)
            }
            Warning::MissingRequired { fields } => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
        }
    }
}

/// The assembled TDML document plus every advisory raised along the way
#[derive(Debug, Clone)]
pub struct RemapOutput {
    pub document: Value,
    pub warnings: Vec<Warning>,
}

/// Canonical HLS surface-reflectance band set
static HLS_BANDS: Lazy<Vec<BandDescriptor>> = Lazy::new(|| {
    vec![
        BandDescriptor::new("Blue", "490nm", "B02"),
        BandDescriptor::new("Green", "560nm", "B03"),
        BandDescriptor::new("Red", "665nm", "B04"),
        BandDescriptor::new("NIR", "865nm", "B8A"),
        BandDescriptor::new("SW1", "1610nm", "B11"),
        BandDescriptor::new("SW2", "2190nm", "B12"),
    ]
});

/// Canonical class-name -> mask-key table for burn scar datasets
static CLASS_KEYS: Lazy<Vec<(String, String)>> = Lazy::new(|| {
    vec![
        ("NotBurned".to_string(), "0".to_string()),
        ("BurnScar".to_string(), "1".to_string()),
        ("NoData".to_string(), "-1".to_string()),
    ]
});

/// Configuration for the remapping process
///
/// Every constant the remapper substitutes when the source document comes up
/// short lives here, so the transform itself stays a pure function of its
/// input and this config.
#[derive(Debug, Clone)]
pub struct RemapConfig {
    /// Identifier used when the source has neither `@id` nor `id`
    pub default_id: String,

    /// Dataset name used when the source has none
    pub default_name: String,

    /// Description used when the source has none
    pub default_description: String,

    /// License URL used when the source has none
    pub default_license: String,

    /// Provider list used when no creator yields a name
    pub default_providers: Vec<String>,

    /// Fixed timestamp for absent creation/modification dates
    pub default_timestamp: String,

    /// Version string used when the source has none
    pub default_version: String,

    /// Record-set name selected as authoritative when present
    pub record_set_sentinel: String,

    /// Lowercase substring that also marks the main record set
    pub record_set_marker: String,

    /// Class-name -> key table for `geocr:mlTask` class lists
    pub class_key_table: Vec<(String, String)>,

    /// Substituted when no class configuration can be derived
    pub default_classes: Vec<ClassEntry>,

    /// Substituted when no band configuration can be derived
    pub default_bands: Vec<BandDescriptor>,

    /// Hard cap on materialized training-data entries
    pub max_data_entries: usize,
}

impl Default for RemapConfig {
    fn default() -> Self {
        RemapConfig {
            default_id: String::from("hls_burn_scars_dataset"),
            default_name: String::from("HLS_Burn_Scars"),
            default_description: String::from("No description provided."),
            default_license: String::from("https://creativecommons.org/licenses/by/4.0/"),
            default_providers: vec![String::from("IBM-NASA Prithvi Models Family")],
            default_timestamp: String::from("2025-01-17T00:00:00Z"),
            default_version: String::from("1.0.0"),
            record_set_sentinel: String::from("hls_burn_scars"),
            record_set_marker: String::from("hls"),
            class_key_table: CLASS_KEYS.clone(),
            default_classes: CLASS_KEYS
                .iter()
                .map(|(name, key)| ClassEntry::new(key, name))
                .collect(),
            default_bands: HLS_BANDS.clone(),
            max_data_entries: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_band_descriptor_description() {
        let band = BandDescriptor::new("Blue", "490nm", "B02");
        assert_eq!(band.description, "Blue band (B02)");
        assert_eq!(
            serde_json::to_value(&band).unwrap(),
            json!({
                "name": "Blue",
                "description": "Blue band (B02)",
                "wavelength": "490nm",
                "hlsBand": "B02"
            })
        );
    }

    #[test]
    fn test_default_config_tables() {
        let config = RemapConfig::default();
        assert_eq!(config.default_bands.len(), 6);
        assert_eq!(config.default_classes.len(), 3);
        assert_eq!(config.default_classes[2], ClassEntry::new("-1", "NoData"));
        assert_eq!(config.max_data_entries, 50);
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::RecordSetFallback {
            name: "other".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "using first record set 'other' as main record set"
        );
    }
}
