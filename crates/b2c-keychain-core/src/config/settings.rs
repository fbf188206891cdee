//! Keychain source settings
//!
//! Layered lowest to highest: built-in defaults, the optional YAML file
//! `<config dir>/b2c-cli/keychain.yaml`, then environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::traits::{ConfigError, ConfigResult};

/// Default service name for keychain entries
pub const DEFAULT_SERVICE: &str = "b2c-cli";

/// Default backend name
pub const DEFAULT_BACKEND: &str = "security";

/// Environment variable for service name override
pub const ENV_SERVICE: &str = "SFCC_KEYCHAIN_SERVICE";

/// Environment variable for fallback instance
pub const ENV_INSTANCE: &str = "SFCC_KEYCHAIN_INSTANCE";

/// Environment variable for backend selection
pub const ENV_BACKEND: &str = "SFCC_KEYCHAIN_BACKEND";

/// Environment variable replacing the `security` program
pub const ENV_PROGRAM: &str = "SFCC_KEYCHAIN_PROGRAM";

/// Settings for the keychain config source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeychainSettings {
    /// Keychain service name all entries live under
    pub service: String,
    /// Instance used when neither the caller nor the global record names one
    pub fallback_instance: Option<String>,
    /// Registered secret store backend to read from
    pub backend: String,
    /// Command run in place of `security` by the `security` backend
    pub program: Option<String>,
}

/// On-disk shape of `keychain.yaml`, also used for environment overrides
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    service: Option<String>,
    instance: Option<String>,
    backend: Option<String>,
    program: Option<String>,
}

impl SettingsFile {
    fn from_env() -> Self {
        Self {
            service: non_empty_var(ENV_SERVICE),
            instance: non_empty_var(ENV_INSTANCE),
            backend: non_empty_var(ENV_BACKEND),
            program: non_empty_var(ENV_PROGRAM),
        }
    }
}

impl Default for KeychainSettings {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            fallback_instance: None,
            backend: DEFAULT_BACKEND.to_string(),
            program: None,
        }
    }
}

impl KeychainSettings {
    /// Defaults overridden by environment variables
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_overrides(SettingsFile::from_env());
        settings
    }

    /// Defaults, then the user settings file if it exists, then environment
    pub fn discover() -> ConfigResult<Self> {
        let mut settings = match Self::user_file_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_overrides(SettingsFile::from_env());
        Ok(settings)
    }

    /// Defaults overridden by a YAML settings file
    ///
    /// A missing file yields the defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let mut settings = Self::default();
        if !path.exists() {
            return Ok(settings);
        }

        debug!(path = %path.display(), "loading keychain settings");
        let content = fs::read_to_string(path)?;
        let file: SettingsFile = if content.trim().is_empty() {
            SettingsFile::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        };

        settings.apply_overrides(file);
        Ok(settings)
    }

    /// `<config dir>/b2c-cli/keychain.yaml`
    pub fn user_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(DEFAULT_SERVICE).join("keychain.yaml"))
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_fallback_instance(mut self, instance: impl Into<String>) -> Self {
        self.fallback_instance = Some(instance.into());
        self
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Apply every non-empty value in `overrides`
    fn apply_overrides(&mut self, overrides: SettingsFile) {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        if let Some(service) = non_empty(overrides.service) {
            self.service = service;
        }
        if let Some(instance) = non_empty(overrides.instance) {
            self.fallback_instance = Some(instance);
        }
        if let Some(backend) = non_empty(overrides.backend) {
            self.backend = backend;
        }
        if let Some(program) = non_empty(overrides.program) {
            self.program = Some(program);
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
