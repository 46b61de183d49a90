//! Manifest model and cross-checks against the selected files.
//!
//! A manifest is a JSON object describing a ROM set. Every field is optional
//! at the type level; which fields are *required* is checked explicitly by
//! [`validate_manifest`] so that a missing field becomes a report entry
//! rather than a parse failure.

use std::collections::HashSet;

use romcheck_core::Catalog;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ManifestError;

/// Fields a manifest must declare, in reporting order.
pub const REQUIRED_FIELDS: [&str; 3] = ["title", "system", "roms"];

/// One ROM declared by a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RomManifestEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expected to equal a selected file's name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Hex-encoded SHA-1 of the full file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Recognized keys whose values have the wrong JSON type, kept verbatim
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub unusable: Map<String, Value>,
}

/// A parsed manifest document. Unrecognized keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RomManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roms: Option<Vec<RomManifestEntry>>,
    /// Recognized keys whose values have the wrong JSON type, kept verbatim.
    /// Such a key still counts as present.
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub unusable: Map<String, Value>,
}

/// Take `value` as a string, or set it aside under `key`.
fn take_string(key: &str, value: Value, unusable: &mut Map<String, Value>) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        other => {
            log::debug!("Manifest field {} is not a string: {}", key, other);
            unusable.insert(key.to_string(), other);
            None
        }
    }
}

impl RomManifestEntry {
    /// Decode one element of `roms`. A non-object element yields an empty
    /// entry, which the validator reports as missing its file.
    fn from_value(value: Value) -> Self {
        let map = match value {
            Value::Object(map) => map,
            other => {
                log::debug!("Manifest rom entry is not an object: {}", other);
                return Self::default();
            }
        };

        let mut entry = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "name" => entry.name = take_string(&key, value, &mut entry.unusable),
                "file" => entry.file = take_string(&key, value, &mut entry.unusable),
                "sha1" => entry.sha1 = take_string(&key, value, &mut entry.unusable),
                "size" => match value.as_u64() {
                    Some(size) => entry.size = Some(size),
                    None => {
                        entry.unusable.insert(key.clone(), value);
                    }
                },
                _ => {}
            }
        }
        entry
    }
}

impl RomManifest {
    fn from_map(map: Map<String, Value>) -> Self {
        let mut manifest = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "title" => manifest.title = take_string(&key, value, &mut manifest.unusable),
                "system" => manifest.system = take_string(&key, value, &mut manifest.unusable),
                "region" => manifest.region = take_string(&key, value, &mut manifest.unusable),
                "description" => {
                    manifest.description = take_string(&key, value, &mut manifest.unusable)
                }
                "roms" => match value {
                    Value::Array(items) => {
                        manifest.roms =
                            Some(items.into_iter().map(RomManifestEntry::from_value).collect())
                    }
                    other => {
                        log::debug!("Manifest roms is not an array: {}", other);
                        manifest.unusable.insert(key.clone(), other);
                    }
                },
                _ => {}
            }
        }
        manifest
    }

    /// Whether a required field's key appears in the manifest object.
    fn has_required_field(&self, field: &str) -> bool {
        let decoded = match field {
            "title" => self.title.is_some(),
            "system" => self.system.is_some(),
            "roms" => self.roms.is_some(),
            _ => false,
        };
        decoded || self.unusable.contains_key(field)
    }
}

/// Parse manifest text.
///
/// The top-level value must be a JSON object. Recognized keys are decoded one
/// by one: a key whose value has the wrong type (including `null`) is kept in
/// `unusable` and still counts as present, so it never causes a
/// missing-field error. A `roms` element that is not an object becomes an
/// empty entry, and a `size` that is not an unsigned integer is dropped from
/// the integrity comparison.
pub fn parse_manifest(text: &str) -> Result<RomManifest, ManifestError> {
    let value: Value = serde_json::from_str(text).map_err(ManifestError::Malformed)?;
    let Value::Object(map) = value else {
        return Err(ManifestError::NotAnObject);
    };
    Ok(RomManifest::from_map(map))
}

/// Check a parsed manifest against the catalog and the selected file names.
///
/// Appends to `errors` and `warnings`; every rule runs regardless of the
/// others. Overall validity is left to the caller.
pub fn validate_manifest(
    manifest: &RomManifest,
    selected: &[&str],
    catalog: &Catalog,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    for field in REQUIRED_FIELDS {
        if !manifest.has_required_field(field) {
            errors.push(format!("manifest is missing required field \"{}\"", field));
        }
    }

    // A non-string system can never name a catalog entry.
    let requested = match (&manifest.system, manifest.unusable.get("system")) {
        (Some(system), _) if !catalog.contains(system) => Some(format!("\"{}\"", system)),
        (None, Some(raw)) => Some(raw.to_string()),
        _ => None,
    };
    if let Some(requested) = requested {
        errors.push(format!(
            "unsupported system {} (supported systems: {})",
            requested,
            catalog.supported_systems()
        ));
    }

    let Some(entries) = &manifest.roms else {
        return;
    };
    let selected: HashSet<&str> = selected.iter().copied().collect();
    for (i, entry) in entries.iter().enumerate() {
        let position = i + 1;
        match &entry.file {
            None => errors.push(format!(
                "manifest rom entry {} is missing the \"file\" field",
                position
            )),
            Some(file) if !selected.contains(file.as_str()) => warnings.push(format!(
                "manifest references \"{}\", which is not among the selected files",
                file
            )),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
#[path = "tests/manifest_tests.rs"]
mod tests;
