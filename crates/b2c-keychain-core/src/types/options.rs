//! Resolution options and results passed across the config source boundary

use std::path::PathBuf;

use serde::Serialize;

use super::config::NormalizedConfig;

/// Options passed to `ConfigSource::load()`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveConfigOptions {
    /// Instance name from the `--instance` flag
    pub instance: Option<String>,
    /// Config file path from the `--config` flag
    pub config_path: Option<PathBuf>,
    /// Starting directory for file searches
    pub start_dir: Option<PathBuf>,
}

impl ResolveConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an instance explicitly
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }
}

/// What a config source produced, and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigLoadResult {
    /// The merged configuration
    pub config: NormalizedConfig,
    /// Provenance, e.g. `keychain:b2c-cli:*,keychain:b2c-cli:staging`
    pub location: String,
}
