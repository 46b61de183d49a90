//! The validation report and its parts.

use serde::Serialize;

use crate::manifest::RomManifest;

/// Reference back to one input file: identity and size, never content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub name: String,
    /// Size reported by the host
    pub size: u64,
    /// Number of bytes actually read, absent when the read failed
    pub byte_length: Option<u64>,
}

/// Detection outcome for one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedRom {
    pub file: FileRef,
    /// Label of the matched format, if any
    pub format: Option<String>,
}

/// The single output of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RomValidationResult {
    /// True iff `errors` is empty
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// One entry per input file, in input order
    pub roms: Vec<DetectedRom>,
    pub manifest: Option<RomManifest>,
}

impl RomValidationResult {
    /// Report for a finished run; validity follows from `errors`.
    pub fn new(
        errors: Vec<String>,
        warnings: Vec<String>,
        roms: Vec<DetectedRom>,
        manifest: Option<RomManifest>,
    ) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            roms,
            manifest,
        }
    }

    /// The state before anything has been validated.
    ///
    /// Not valid, but carries no errors either: there is nothing to report.
    pub fn initial() -> Self {
        Self {
            is_valid: false,
            errors: Vec::new(),
            warnings: Vec::new(),
            roms: Vec::new(),
            manifest: None,
        }
    }
}

impl Default for RomValidationResult {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_follows_errors() {
        assert!(RomValidationResult::new(vec![], vec!["w".into()], vec![], None).is_valid);
        assert!(!RomValidationResult::new(vec!["e".into()], vec![], vec![], None).is_valid);
    }

    #[test]
    fn initial_is_not_valid() {
        let initial = RomValidationResult::initial();
        assert!(!initial.is_valid);
        assert!(initial.errors.is_empty());
        assert!(initial.roms.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let report = RomValidationResult::new(
            vec![],
            vec![],
            vec![DetectedRom {
                file: FileRef {
                    name: "game.nes".into(),
                    size: 16,
                    byte_length: Some(16),
                },
                format: Some("NES".into()),
            }],
            None,
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["roms"][0]["file"]["byteLength"], 16);
        assert_eq!(json["roms"][0]["format"], "NES");
        assert!(json["manifest"].is_null());
    }
}
