//! Application settings loaded from config.toml
//!
//! Every field is optional. Without a config file the tracker runs with the
//! built-in preset catalog and the default storage keys.

use crate::{
    core::{
        catalog::{Catalog, PresetTask},
        storage::{DEFAULT_LEGACY_STORAGE_KEY, DEFAULT_STORAGE_KEY, StorageKeys},
    },
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "HABIT_BUDDY_CONFIG";

/// Structure of config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key the session blob is saved under
    pub storage_key: Option<String>,
    /// Read-only fallback key; an empty string disables the fallback
    pub legacy_storage_key: Option<String>,
    /// Database URL, overriding `DATABASE_URL`
    pub database_url: Option<String>,
    /// Replacement preset catalog; empty means the built-in one
    pub presets: Vec<PresetTask>,
}

impl Settings {
    /// Storage keys with defaults filled in.
    #[must_use]
    pub fn storage_keys(&self) -> StorageKeys {
        let legacy = self
            .legacy_storage_key
            .clone()
            .unwrap_or_else(|| DEFAULT_LEGACY_STORAGE_KEY.to_string());
        StorageKeys {
            primary: self
                .storage_key
                .clone()
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            legacy: Some(legacy).filter(|k| !k.is_empty()),
        }
    }

    /// The configured catalog, or the built-in one.
    #[must_use]
    pub fn catalog(&self) -> Catalog {
        if self.presets.is_empty() {
            Catalog::builtin()
        } else {
            Catalog::new(self.presets.clone())
        }
    }

    /// Database URL from config, then `DATABASE_URL`, then the default.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(crate::config::database::get_database_url)
    }
}

/// Parses settings from a TOML string.
///
/// # Errors
/// Returns an error if the TOML syntax is invalid or a field has the wrong type.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from `path`. A missing file yields the defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No config file at {:?}, using defaults", path);
        return Ok(Settings::default());
    }

    debug!("Loading configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path:?}: {e}"),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `$HABIT_BUDDY_CONFIG`, or ./config.toml.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    load_settings(path)
}
