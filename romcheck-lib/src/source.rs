//! Input handles supplied by the host.
//!
//! The engine never opens files on its own; it is handed sources that know
//! their name and size and can produce their content asynchronously. File and
//! in-memory implementations are provided.

use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// A selected ROM file.
#[allow(async_fn_in_trait)]
pub trait RomSource {
    /// File name used for detection and manifest cross-referencing.
    fn name(&self) -> &str;

    /// Size in bytes as reported by the host.
    fn size(&self) -> u64;

    /// Read the full content.
    async fn read_bytes(&self) -> Result<Vec<u8>, SourceError>;
}

/// A manifest document.
#[allow(async_fn_in_trait)]
pub trait ManifestSource {
    fn name(&self) -> &str;

    /// Read the full content as UTF-8 text.
    async fn read_text(&self) -> Result<String, SourceError>;
}

impl<T: RomSource> RomSource for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn size(&self) -> u64 {
        (**self).size()
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, SourceError> {
        (**self).read_bytes().await
    }
}

impl<T: ManifestSource> ManifestSource for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn read_text(&self) -> Result<String, SourceError> {
        (**self).read_text().await
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A ROM file on disk.
#[derive(Debug, Clone)]
pub struct FileRomSource {
    path: PathBuf,
    name: String,
    size: u64,
}

impl FileRomSource {
    /// Create a source for `path`, taking its size from metadata.
    ///
    /// A path whose metadata cannot be read gets size 0; the failure
    /// surfaces when the content is read.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let size = match std::fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                log::debug!("No metadata for {}: {}", path.display(), e);
                0
            }
        };
        Self {
            name: file_name_of(&path),
            path,
            size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RomSource for FileRomSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, SourceError> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// A manifest file on disk.
#[derive(Debug, Clone)]
pub struct FileManifestSource {
    path: PathBuf,
    name: String,
}

impl FileManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: file_name_of(&path),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ManifestSource for FileManifestSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_text(&self) -> Result<String, SourceError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// A ROM already held in memory.
#[derive(Debug, Clone)]
pub struct MemoryRomSource {
    name: String,
    bytes: Vec<u8>,
}

impl MemoryRomSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl RomSource for MemoryRomSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, SourceError> {
        Ok(self.bytes.clone())
    }
}

/// A manifest already held in memory.
#[derive(Debug, Clone)]
pub struct MemoryManifestSource {
    name: String,
    text: String,
}

impl MemoryManifestSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl ManifestSource for MemoryManifestSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_text(&self) -> Result<String, SourceError> {
        Ok(self.text.clone())
    }
}
