use thiserror::Error;

/// Errors from reading a ROM or manifest source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// I/O error while reading the source
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Manifest bytes are not UTF-8 text
    #[error("not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The read did not finish within the configured limit
    #[error("read timed out")]
    TimedOut,
}

/// Errors from turning manifest text into a [`RomManifest`](crate::RomManifest).
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The text is not well-formed JSON
    #[error("failed to parse manifest: {0}")]
    Malformed(serde_json::Error),

    /// The top-level JSON value is not an object
    #[error("manifest does not contain a valid object")]
    NotAnObject,
}

/// Errors from loading the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
}
