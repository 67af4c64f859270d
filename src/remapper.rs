//! The Metadata Remapper: GeoCroissant in, TDML out
//!
//! Everything here operates on parsed `serde_json::Value` documents. The
//! remapper holds no state beyond its [`RemapConfig`]; the same source
//! document always produces the same target document.

use crate::error::ConvertError;
use crate::types::{
    BandDescriptor, BandSource, ClassEntry, ClassSource, RemapConfig, RemapOutput, Warning,
};
use serde_json::{json, Value};

/// Fields the target schema requires; checked (never enforced) after assembly
const REQUIRED_FIELDS: [&str; 13] = [
    "type",
    "id",
    "name",
    "description",
    "license",
    "providers",
    "createdTime",
    "updatedTime",
    "version",
    "tasks",
    "classes",
    "bands",
    "data",
];

/// The core converter from GeoCroissant metadata to a TDML document
pub struct Remapper {
    config: RemapConfig,
}

impl Remapper {
    pub fn new(config: RemapConfig) -> Self {
        Remapper { config }
    }

    /// Remap a parsed GeoCroissant document into a TDML document.
    ///
    /// Fails only when no main record set can be determined; every other
    /// defect in the source is patched with a documented default and
    /// reported through [`RemapOutput::warnings`].
    pub fn remap(&self, source: &Value) -> Result<RemapOutput, ConvertError> {
        let mut warnings = Vec::new();
        let cfg = &self.config;

        let record_set = self.select_record_set(source, &mut warnings)?;

        let id = string_field(source, &["@id", "id"], "id", &cfg.default_id, &mut warnings);
        let name = string_field(source, &["name"], "name", &cfg.default_name, &mut warnings);
        let description = string_field(
            source,
            &["description"],
            "description",
            &cfg.default_description,
            &mut warnings,
        );
        let license = self.resolve_license(source, &mut warnings);
        let providers = self.resolve_providers(source, &mut warnings);
        let created_time = string_field(
            source,
            &["dateCreated", "created_time"],
            "createdTime",
            &cfg.default_timestamp,
            &mut warnings,
        );
        let updated_time = string_field(
            source,
            &["dateModified", "updated_time"],
            "updatedTime",
            &cfg.default_timestamp,
            &mut warnings,
        );
        let version = string_field(
            source,
            &["version"],
            "version",
            &cfg.default_version,
            &mut warnings,
        );

        // Resolve where bands and classes live before extracting anything
        let bands = self.extract_bands(band_source(source, record_set), &mut warnings);
        let classes = self.extract_classes(class_source(source, record_set), &mut warnings);

        let (total, training, validation) = data_statistics(source);
        let data = self.assemble_data(source, total, &mut warnings);

        let amount_of_training_data = data.len();
        let number_of_classes = classes.len();

        let document = json!({
            "type": "EOTrainingDataset",
            "id": id,
            "name": name,
            "description": description,
            "license": license,
            "providers": providers,
            "createdTime": created_time,
            "updatedTime": updated_time,
            "version": version,
            "tasks": self.tasks(),
            "classes": classes,
            "bands": bands,
            "data": data,
            "amountOfTrainingData": amount_of_training_data,
            "numberOfClasses": number_of_classes,
            "dataStatistics": {
                "totalSamples": total,
                "trainingSamples": training,
                "validationSamples": validation
            }
        });

        self.check_required(&document, &mut warnings);

        Ok(RemapOutput { document, warnings })
    }

    /// Pick the authoritative record set: sentinel name first, then the
    /// marker substring, then the first entry with a warning.
    fn select_record_set<'a>(
        &self,
        source: &'a Value,
        warnings: &mut Vec<Warning>,
    ) -> Result<&'a Value, ConvertError> {
        let record_sets = match source.get("recordSet").and_then(Value::as_array) {
            Some(sets) if !sets.is_empty() => sets,
            _ => return Err(ConvertError::NoRecordSet),
        };

        for rs in record_sets {
            let name = record_set_name(rs);
            if name == self.config.record_set_sentinel
                || name.to_lowercase().contains(&self.config.record_set_marker)
            {
                return Ok(rs);
            }
        }

        let first = &record_sets[0];
        warnings.push(Warning::RecordSetFallback {
            name: record_set_name(first).to_string(),
        });
        Ok(first)
    }

    fn extract_bands(
        &self,
        source: Option<BandSource>,
        warnings: &mut Vec<Warning>,
    ) -> Vec<BandDescriptor> {
        let mut bands = Vec::new();

        match source {
            Some(BandSource::SensorCharacteristics(config)) => {
                for (key, info) in config {
                    if key.starts_with("band") {
                        bands.push(band_from_info(info, &format!("Band {}", key)));
                    }
                }
            }
            Some(BandSource::RecordSetField(config)) => {
                // Indexed band1..bandN, not object iteration order
                let total = config.get("totalBands").and_then(Value::as_u64).unwrap_or(0);
                for i in 1..=total {
                    if let Some(info) = config.get(&format!("band{}", i)) {
                        bands.push(band_from_info(info, &format!("Band {}", i)));
                    }
                }
            }
            None => {}
        }

        if bands.is_empty() {
            warnings.push(Warning::DefaultBands);
            bands = self.config.default_bands.clone();
        }
        bands
    }

    fn extract_classes(
        &self,
        source: Option<ClassSource>,
        warnings: &mut Vec<Warning>,
    ) -> Vec<ClassEntry> {
        let mut classes = Vec::new();

        match source {
            Some(ClassSource::MlTask(names)) => {
                for name in names {
                    if let Some(name) = name.as_str() {
                        let key = self
                            .config
                            .class_key_table
                            .iter()
                            .find(|(known, _)| known == name)
                            .map(|(_, key)| key.clone())
                            // Unmapped names take the next ordinal key
                            .unwrap_or_else(|| classes.len().to_string());
                        classes.push(ClassEntry::new(key, name));
                    }
                }
            }
            Some(ClassSource::RecordSetField(values)) => {
                for (key, value) in values {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    classes.push(ClassEntry::new(key.clone(), value));
                }
            }
            None => {}
        }

        if classes.is_empty() {
            warnings.push(Warning::DefaultClasses);
            classes = self.config.default_classes.clone();
        }
        classes
    }

    /// Build training-data entries from the file listing, train split first.
    ///
    /// Pairs with a missing URL are skipped and do not consume the cap; ids
    /// are assigned from the emitted position, not the source position.
    fn assemble_data(
        &self,
        source: &Value,
        total_samples: u64,
        warnings: &mut Vec<Warning>,
    ) -> Vec<Value> {
        let listing = source.get("geocr:fileListing");
        let images = split_urls(listing, "images");
        let annotations = split_urls(listing, "annotations");

        let pairs = images.len().min(annotations.len());
        if pairs == 0 {
            warnings.push(Warning::EmptyFileListing);
            return Vec::new();
        }

        let cap = if total_samples > 0 {
            self.config.max_data_entries.min(total_samples as usize)
        } else {
            self.config.max_data_entries
        };

        let mut data = Vec::new();
        for i in 0..pairs {
            if data.len() >= cap {
                break;
            }
            let (image_url, mask_url) = (&images[i], &annotations[i]);
            if image_url.is_empty() || mask_url.is_empty() {
                warnings.push(Warning::SkippedPair { index: i });
                continue;
            }
            data.push(json!({
                "type": "EOTrainingData",
                "id": format!("data_{}", data.len()),
                "dataUrl": [image_url],
                "labels": [{
                    "type": "PixelLabel",
                    "imageUrl": [mask_url],
                    "imageFormat": ["image/tiff"],
                    "class": ""
                }]
            }));
        }
        data
    }

    /// The single synthesized segmentation task. The target schema allows
    /// several; deriving more than one from source metadata is unsupported.
    fn tasks(&self) -> Value {
        json!([{
            "type": "EOTask",
            "id": "task_0",
            "name": "Burn Scar Segmentation",
            "description": "Semantic segmentation of burn scars in satellite imagery using HLS data.",
            "inputType": "image",
            "outputType": "mask",
            "taskType": "segmentation"
        }])
    }

    fn resolve_license(&self, source: &Value, warnings: &mut Vec<Warning>) -> String {
        let license = match source.get("license") {
            Some(Value::Array(items)) => items.first().and_then(Value::as_str),
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        };
        match license {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                warnings.push(Warning::MissingField { field: "license" });
                self.config.default_license.clone()
            }
        }
    }

    /// A creator entry is either an organization object or a bare name;
    /// `creator` itself may be a single object or an array of entries.
    fn resolve_providers(&self, source: &Value, warnings: &mut Vec<Warning>) -> Vec<String> {
        let mut providers = Vec::new();
        match source.get("creator") {
            Some(Value::Array(creators)) => {
                for creator in creators {
                    push_provider(creator, &mut providers);
                }
            }
            Some(creator @ Value::Object(_)) => push_provider(creator, &mut providers),
            _ => {}
        }

        if providers.is_empty() {
            warnings.push(Warning::MissingField { field: "providers" });
            providers = self.config.default_providers.clone();
        }
        providers
    }

    /// Report required fields still empty after every fallback fired.
    /// Advisory only: the document is written either way.
    fn check_required(&self, document: &Value, warnings: &mut Vec<Warning>) {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| document.get(*field).map_or(true, is_falsy))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            warnings.push(Warning::MissingRequired { fields: missing });
        }
    }
}

/// Resolve where band metadata lives. A usable top-level
/// `geocr:sensorCharacteristics` object wins over the record-set field.
fn band_source<'a>(source: &'a Value, record_set: &'a Value) -> Option<BandSource<'a>> {
    if let Some(config) = source
        .get("geocr:sensorCharacteristics")
        .and_then(Value::as_array)
        .and_then(|chars| chars.first())
        .and_then(|c| c.get("bandConfiguration"))
        .and_then(Value::as_object)
    {
        if !config.is_empty() {
            return Some(BandSource::SensorCharacteristics(config));
        }
    }

    record_set_fields(record_set)
        .iter()
        .filter(|field| field_name(field).contains("image"))
        .find_map(|field| field.get("geocr:bandConfiguration").and_then(Value::as_object))
        .map(BandSource::RecordSetField)
}

/// Resolve where class metadata lives. A non-empty top-level
/// `geocr:mlTask.classes` list wins over the record-set field.
fn class_source<'a>(source: &'a Value, record_set: &'a Value) -> Option<ClassSource<'a>> {
    if let Some(classes) = source
        .get("geocr:mlTask")
        .and_then(|task| task.get("classes"))
        .and_then(Value::as_array)
    {
        if !classes.is_empty() {
            return Some(ClassSource::MlTask(classes.as_slice()));
        }
    }

    record_set_fields(record_set)
        .iter()
        .filter(|field| field_name(field).contains("annotation"))
        .find_map(|field| field.get("geocr:classValues").and_then(Value::as_object))
        .map(ClassSource::RecordSetField)
}

/// First non-empty string among `keys`, else the default with a warning
fn string_field(
    source: &Value,
    keys: &[&str],
    field: &'static str,
    default: &str,
    warnings: &mut Vec<Warning>,
) -> String {
    for key in keys {
        if let Some(s) = source.get(*key).and_then(Value::as_str) {
            if !s.is_empty() {
                return s.to_string();
            }
        }
    }
    warnings.push(Warning::MissingField { field });
    default.to_string()
}

fn push_provider(creator: &Value, providers: &mut Vec<String>) {
    match creator {
        Value::Object(obj) => {
            if let Some(name) = obj.get("name").and_then(Value::as_str) {
                if !name.is_empty() {
                    providers.push(name.to_string());
                }
            }
        }
        Value::String(name) => providers.push(name.clone()),
        _ => {}
    }
}

fn band_from_info(info: &Value, fallback_name: &str) -> BandDescriptor {
    let name = info.get("name").and_then(Value::as_str).unwrap_or(fallback_name);
    let wavelength = info.get("wavelength").and_then(Value::as_str).unwrap_or("");
    let hls_band = info.get("hlsBand").and_then(Value::as_str).unwrap_or("");
    BandDescriptor::new(name, wavelength, hls_band)
}

/// Concatenated train-then-val URL list for one side of the file listing.
/// Non-string entries come back empty and get skipped during pairing.
fn split_urls(listing: Option<&Value>, side: &str) -> Vec<String> {
    let mut urls = Vec::new();
    if let Some(side) = listing.and_then(|l| l.get(side)) {
        for split in ["train", "val"] {
            if let Some(items) = side.get(split).and_then(Value::as_array) {
                for item in items {
                    urls.push(item.as_str().unwrap_or("").to_string());
                }
            }
        }
    }
    urls
}

fn data_statistics(source: &Value) -> (u64, u64, u64) {
    let stats = source.get("geocr:dataStatistics");
    let count = |key: &str| {
        stats
            .and_then(|s| s.get(key))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    };
    (
        count("totalSamples"),
        count("trainingSamples"),
        count("validationSamples"),
    )
}

fn record_set_fields(record_set: &Value) -> &[Value] {
    record_set
        .get("field")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn record_set_name(record_set: &Value) -> &str {
    record_set.get("name").and_then(Value::as_str).unwrap_or("unknown")
}

fn field_name(field: &Value) -> &str {
    field.get("name").and_then(Value::as_str).unwrap_or("")
}

/// The truthiness rule the target contract is phrased in: null, false,
/// zero and empty strings/collections all count as missing
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
