//! Format detection from a filename and, optionally, file contents.
//!
//! Extension evidence always wins over signature evidence. Bytes are only
//! consulted when the extension is unknown; Game Boy and SNES images have no
//! signature and are recognized by extension alone.

use crate::catalog::{Catalog, RomFormat};

/// Extract the lowercase extension of `filename`, including the dot.
///
/// Returns the substring from the last `.` to the end, so ".nes" yields
/// ".nes" and "game." yields ".". A name without any `.` has no extension.
pub fn file_extension(filename: &str) -> Option<String> {
    filename.rfind('.').map(|i| filename[i..].to_lowercase())
}

impl Catalog {
    /// Detect the format of a file.
    ///
    /// Scans the catalog in order by extension first, then (only if no
    /// extension matched and a buffer was given) by signature. Returns
    /// `None` for unknown files, which is a normal outcome.
    pub fn detect(&self, filename: &str, buffer: Option<&[u8]>) -> Option<&RomFormat> {
        if let Some(ext) = file_extension(filename) {
            if let Some(format) = self.formats().iter().find(|f| f.has_extension(&ext)) {
                log::debug!("{}: matched {} by extension {}", filename, format.id, ext);
                return Some(format);
            }
        }

        let buffer = buffer?;
        let format = self.formats().iter().find(|f| {
            f.signature
                .as_ref()
                .is_some_and(|sig| sig.matches(buffer))
        })?;
        log::debug!("{}: matched {} by signature", filename, format.id);
        Some(format)
    }
}

/// Detect a file's format against the built-in catalog.
pub fn detect_format(filename: &str, buffer: Option<&[u8]>) -> Option<&'static RomFormat> {
    Catalog::builtin().detect(filename, buffer)
}

#[cfg(test)]
#[path = "tests/detect_tests.rs"]
mod tests;
