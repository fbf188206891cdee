//! Configuration source trait

use crate::types::{ConfigLoadResult, ResolveConfigOptions};

/// A pluggable contributor to the host CLI's configuration pipeline
///
/// Implementations:
/// - `KeychainSource`: global and per-instance records from the keychain
pub trait ConfigSource: Send + Sync {
    /// Unique name for this source (used in diagnostics)
    fn name(&self) -> &str;

    /// Load configuration from this source
    ///
    /// Returns `None` when the source has nothing to offer. That is a normal
    /// outcome, not an error.
    fn load(&self, options: &ResolveConfigOptions) -> Option<ConfigLoadResult>;

    /// Where this source reads from, for diagnostics
    fn path(&self) -> Option<String> {
        None
    }
}

/// Errors that can occur while loading settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Unknown secret store backend: {0}")]
    UnknownBackend(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
