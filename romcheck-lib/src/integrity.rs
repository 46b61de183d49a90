//! Compare manifest-declared sizes and hashes with the bytes actually read.

use sha1::{Digest, Sha1};

use crate::manifest::RomManifest;

/// Lowercase hex SHA-1 of `data`.
pub fn sha1_hex(data: &[u8]) -> String {
    format!("{:x}", Sha1::digest(data))
}

/// Append a warning for every manifest entry whose declared `size` or `sha1`
/// disagrees with the content of the selected file it names.
///
/// `files` pairs each successfully read file name with its bytes. Entries
/// that name no readable file are skipped; the manifest validator already
/// reports those.
pub fn check_integrity(manifest: &RomManifest, files: &[(&str, &[u8])], warnings: &mut Vec<String>) {
    let Some(entries) = &manifest.roms else {
        return;
    };

    for entry in entries {
        let Some(file) = entry.file.as_deref() else {
            continue;
        };
        let Some(&(_, data)) = files.iter().find(|(name, _)| *name == file) else {
            continue;
        };

        if let Some(expected) = entry.size {
            let actual = data.len() as u64;
            if expected != actual {
                warnings.push(format!(
                    "\"{}\" is {} bytes but the manifest declares {}",
                    file, actual, expected
                ));
            }
        }

        if let Some(expected) = entry.sha1.as_deref() {
            let actual = sha1_hex(data);
            if !expected.trim().eq_ignore_ascii_case(&actual) {
                warnings.push(format!(
                    "\"{}\" has SHA-1 {} but the manifest declares {}",
                    file,
                    actual,
                    expected.trim()
                ));
            }
        }
    }
}
