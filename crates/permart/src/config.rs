#![forbid(unsafe_code)]

//! Configuration file support for the `permart` tool.

use permart_core::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "permart.toml";

/// Verification preferences.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Issuer public key (PEM or DER).
    pub issuer_key: Option<PathBuf>,

    /// Artifacts arrive base64 encoded.
    pub base64: bool,

    /// Print calendar-normalized UTC times instead of raw offset fields.
    pub normalize_times: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            issuer_key: None,
            base64: true,
            normalize_times: true,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    /// Load configuration from `path`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        log::debug!("loading configuration from {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        let mut config = Self::from_toml(&content)?;

        // Relative key paths are relative to the config file.
        if let (Some(key), Some(dir)) = (&config.issuer_key, path.parent()) {
            if key.is_relative() {
                config.issuer_key = Some(dir.join(key));
            }
        }
        Ok(config)
    }

    /// Load the explicit file, or the default file if present, or defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, Error> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
