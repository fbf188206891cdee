//! B2C Keychain Core
//!
//! Credential resolution for the B2C CLI from the system keychain.
//! A global-defaults record (account `*`) is merged with an
//! instance-specific record, and the result is handed to the host CLI as
//! one pluggable configuration source.
//!
//! ## Storing credentials
//!
//! ```bash
//! # Global defaults (shared OAuth credentials)
//! security add-generic-password -s 'b2c-cli' -a '*' \
//!   -w '{"clientId":"shared-id","clientSecret":"shared-secret","defaultInstance":"staging"}' -U
//!
//! # Instance-specific credentials
//! security add-generic-password -s 'b2c-cli' -a 'staging' \
//!   -w '{"username":"user@example.com","password":"my-key"}' -U
//! ```
//!
//! ## Resolving
//!
//! ```rust,no_run
//! use b2c_keychain_core::{ConfigSource, KeychainSource, ResolveConfigOptions};
//!
//! let source = KeychainSource::discover()?;
//! if let Some(result) = source.load(&ResolveConfigOptions::new().with_instance("staging")) {
//!     println!("{} from {}", result.config.username.unwrap_or_default(), result.location);
//! }
//! # Ok::<(), b2c_keychain_core::ConfigError>(())
//! ```

pub mod types;
pub mod secrets;
pub mod config;
pub mod resolver;

// Re-export commonly used types
pub use types::{NormalizedConfig, KeychainConfig, ResolveConfigOptions, ConfigLoadResult};

pub use secrets::{
    SecretStore, SecretStoreError, SecretStoreResult,
    SecurityCliStore, KeychainSecretStore, MemorySecretStore,
    fetch_config, register_secret_store, create_secret_store, list_secret_stores,
};

pub use config::{
    ConfigSource, ConfigError, ConfigResult, KeychainSettings,
    ConfigSourceRegistry, ConfigSourcesHookResult, SourcePriority,
};

pub use resolver::{KeychainSource, keychain_sources_hook};
