//! Ordered table of supported systems and their identification rules.
//!
//! Order matters: detection scans the table front to back and the first
//! matching entry wins, both for extensions shared between formats and for
//! signature checks. Supported-system messages list ids in the same order.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

use crate::error::CatalogError;

/// A fixed pattern expected at a specific offset within a ROM image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Signature {
    /// An exact byte sequence.
    Bytes { offset: usize, bytes: Vec<u8> },
    /// An ASCII text sequence, compared byte for byte.
    Text { offset: usize, text: String },
}

impl Signature {
    pub fn bytes(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            offset,
            bytes: bytes.into(),
        }
    }

    pub fn text(offset: usize, text: impl Into<String>) -> Self {
        Self::Text {
            offset,
            text: text.into(),
        }
    }

    /// Byte offset within the file where the pattern must start.
    pub fn offset(&self) -> usize {
        match self {
            Self::Bytes { offset, .. } | Self::Text { offset, .. } => *offset,
        }
    }

    /// The raw bytes to compare.
    pub fn pattern(&self) -> &[u8] {
        match self {
            Self::Bytes { bytes, .. } => bytes,
            Self::Text { text, .. } => text.as_bytes(),
        }
    }

    /// Check whether `buffer` holds the pattern at the signature's offset.
    ///
    /// A buffer too short to contain the whole pattern is a non-match.
    pub fn matches(&self, buffer: &[u8]) -> bool {
        let pattern = self.pattern();
        let start = self.offset();
        let Some(end) = start.checked_add(pattern.len()) else {
            return false;
        };
        buffer.get(start..end) == Some(pattern)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes { offset, bytes } => {
                let hex: Vec<String> = bytes.iter().map(|b| format!("{:02X}", b)).collect();
                write!(f, "bytes {} at 0x{:X}", hex.join(" "), offset)
            }
            Self::Text { offset, text } => write!(f, "text {:?} at 0x{:X}", text, offset),
        }
    }
}

/// An entry in the format catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RomFormat {
    /// Short unique key (e.g., "nes")
    pub id: String,
    /// Human-readable system name
    pub label: String,
    /// Lowercase filename suffixes, including the leading dot
    pub extensions: Vec<String>,
    /// Optional magic pattern
    pub signature: Option<Signature>,
}

impl RomFormat {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            extensions: Vec::new(),
            signature: None,
        }
    }

    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Check whether `extension` (lowercase, with dot) belongs to this format.
    pub fn has_extension(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e == extension)
    }
}

/// GBA cartridges start their Nintendo logo at 0x04; these are its first bytes.
const GBA_LOGO_HEAD: [u8; 4] = [0x24, 0xFF, 0xAE, 0x51];

fn builtin_formats() -> Vec<RomFormat> {
    vec![
        RomFormat::new("nes", "NES")
            .extensions(&[".nes"])
            .signature(Signature::bytes(0, *b"NES\x1A")),
        // No dependable magic; filename only.
        RomFormat::new("gb", "Game Boy").extensions(&[".gb", ".gbc"]),
        RomFormat::new("gba", "Game Boy Advance")
            .extensions(&[".gba"])
            .signature(Signature::bytes(0x04, GBA_LOGO_HEAD)),
        RomFormat::new("snes", "SNES").extensions(&[".sfc", ".smc"]),
    ]
}

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| Catalog {
    formats: builtin_formats(),
});

/// Ordered, read-only collection of [`RomFormat`] entries.
#[derive(Debug, Clone)]
pub struct Catalog {
    formats: Vec<RomFormat>,
}

impl Catalog {
    /// Build a catalog from `formats`, keeping their order as precedence order.
    pub fn new(formats: Vec<RomFormat>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for format in &formats {
            if format.id.is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !seen.insert(format.id.as_str()) {
                return Err(CatalogError::duplicate_id(&format.id));
            }
            for ext in &format.extensions {
                if !ext.starts_with('.') || *ext != ext.to_lowercase() {
                    return Err(CatalogError::invalid_extension(&format.id, ext));
                }
            }
            if let Some(sig) = &format.signature {
                if sig.pattern().is_empty() {
                    return Err(CatalogError::empty_signature(&format.id));
                }
            }
        }
        Ok(Self { formats })
    }

    /// The process-wide catalog of supported systems.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn formats(&self) -> &[RomFormat] {
        &self.formats
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Look up a format by id (exact match).
    pub fn get(&self, id: &str) -> Option<&RomFormat> {
        self.formats.iter().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(|f| f.id.as_str())
    }

    /// Ids joined for display, e.g. "nes, gb, gba, snes".
    pub fn supported_systems(&self) -> String {
        self.ids().collect::<Vec<_>>().join(", ")
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a RomFormat;
    type IntoIter = std::slice::Iter<'a, RomFormat>;

    fn into_iter(self) -> Self::IntoIter {
        self.formats.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_is_stable() {
        let ids: Vec<&str> = Catalog::builtin().ids().collect();
        assert_eq!(ids, ["nes", "gb", "gba", "snes"]);
        assert_eq!(Catalog::builtin().supported_systems(), "nes, gb, gba, snes");
    }

    #[test]
    fn builtin_passes_validation() {
        let formats = Catalog::builtin().formats().to_vec();
        assert!(Catalog::new(formats).is_ok());
    }

    #[test]
    fn lookup_by_id() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.get("nes").map(|f| f.label.as_str()), Some("NES"));
        assert_eq!(
            catalog.get("gba").map(|f| f.label.as_str()),
            Some("Game Boy Advance")
        );
        assert!(catalog.get("n64").is_none());
        // Ids are exact keys, not aliases
        assert!(!catalog.contains("NES"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Catalog::new(vec![
            RomFormat::new("nes", "NES"),
            RomFormat::new("nes", "Famicom"),
        ]);
        assert_eq!(result.unwrap_err(), CatalogError::duplicate_id("nes"));
    }

    #[test]
    fn extensions_need_a_lowercase_dot_prefix() {
        let missing_dot = Catalog::new(vec![RomFormat::new("nes", "NES").extensions(&["nes"])]);
        assert!(matches!(
            missing_dot,
            Err(CatalogError::InvalidExtension { .. })
        ));

        let upper = Catalog::new(vec![RomFormat::new("nes", "NES").extensions(&[".NES"])]);
        assert!(matches!(upper, Err(CatalogError::InvalidExtension { .. })));
    }

    #[test]
    fn empty_signature_is_rejected() {
        let result = Catalog::new(vec![
            RomFormat::new("x", "X").signature(Signature::text(0, "")),
        ]);
        assert_eq!(result.unwrap_err(), CatalogError::empty_signature("x"));
    }

    #[test]
    fn signature_respects_offset_and_length() {
        let sig = Signature::text(2, "AB");
        assert!(sig.matches(b"xxAB"));
        assert!(sig.matches(b"xxABzz"));
        assert!(!sig.matches(b"xxA"));
        assert!(!sig.matches(b"ABxx"));
        assert!(!sig.matches(b""));
    }

    #[test]
    fn signature_display() {
        let nes = Catalog::builtin().get("nes").unwrap();
        assert_eq!(
            nes.signature.as_ref().unwrap().to_string(),
            "bytes 4E 45 53 1A at 0x0"
        );
        assert_eq!(Signature::text(0x10, "SEGA").to_string(), "text \"SEGA\" at 0x10");
    }
}
