//! Host settings (`~/.config/romcheck/settings.toml`).
//!
//! Hosts read defaults for [`ValidationOptions`] from here; command-line
//! flags override them. A missing file or missing keys fall back to the
//! built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::error::SettingsError;
use crate::orchestrator::ValidationOptions;

/// Canonical path to the settings file: `~/.config/romcheck/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("romcheck").join("settings.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub validation: ValidationSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Per-read timeout in seconds; unset or 0 means no limit
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,

    #[serde(default)]
    pub verify_integrity: Option<bool>,
}

impl Settings {
    /// Build validation options from these settings.
    pub fn validation_options(&self) -> ValidationOptions {
        let defaults = ValidationOptions::default();
        let timeout = self
            .validation
            .read_timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);
        let verify = self
            .validation
            .verify_integrity
            .unwrap_or(defaults.verify_integrity);
        defaults.read_timeout(timeout).verify_integrity(verify)
    }
}

/// Load settings from the canonical path.
pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_from(&settings_path())
}

/// Load settings from `path`. A missing file yields the defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(e) => return Err(e.into()),
    };
    Ok(toml::from_str(&contents)?)
}

/// Load the settings file as a pretty-printed TOML string for display.
pub fn load_settings_string(path: &Path) -> Result<Option<String>, SettingsError> {
    if !path.exists() {
        return Ok(None);
    }
    let settings = load_settings_from(path)?;
    Ok(toml::to_string_pretty(&settings).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = load_settings_from(&tmp.path().join("settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        let options = settings.validation_options();
        assert!(options.read_timeout.is_none());
        assert!(options.verify_integrity);
    }

    #[test]
    fn test_load_validation_section() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(
            &path,
            "[validation]\nread_timeout_secs = 30\nverify_integrity = false\n",
        )
        .unwrap();

        let options = load_settings_from(&path).unwrap().validation_options();
        assert_eq!(options.read_timeout, Some(Duration::from_secs(30)));
        assert!(!options.verify_integrity);
    }

    #[test]
    fn test_zero_timeout_means_unlimited() {
        let settings = Settings {
            validation: ValidationSettings {
                read_timeout_secs: Some(0),
                verify_integrity: None,
            },
        };
        assert!(settings.validation_options().read_timeout.is_none());
    }

    #[test]
    fn test_unknown_sections_are_ignored() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "[library]\ncurrent_root = \"/roms\"\n").unwrap();
        assert_eq!(load_settings_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "[validation\nread_timeout_secs = ").unwrap();
        assert!(matches!(
            load_settings_from(&path),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_settings_string() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        assert!(load_settings_string(&path).unwrap().is_none());

        std::fs::write(&path, "[validation]\nread_timeout_secs = 5\n").unwrap();
        let shown = load_settings_string(&path).unwrap().unwrap();
        assert!(shown.contains("read_timeout_secs = 5"));
    }
}
