//! ROM asset validation.
//!
//! Ties the format catalog from `romcheck-core` to the host's inputs: reads
//! ROM and manifest sources, detects formats, checks the manifest against the
//! selected files, and publishes one [`RomValidationResult`] per run.

pub mod error;
pub mod integrity;
pub mod manifest;
pub mod orchestrator;
pub mod report;
pub mod settings;
pub mod source;

pub use error::{ManifestError, SettingsError, SourceError};
pub use manifest::{RomManifest, RomManifestEntry, parse_manifest, validate_manifest};
pub use orchestrator::{RomValidator, RunToken, ValidationOptions, run_validation};
pub use report::{DetectedRom, FileRef, RomValidationResult};
pub use source::{
    FileManifestSource, FileRomSource, ManifestSource, MemoryManifestSource, MemoryRomSource,
    RomSource,
};

// Re-export core types so hosts only need this crate
pub use romcheck_core::{Catalog, CatalogError, RomFormat, Signature, detect_format, file_extension};
