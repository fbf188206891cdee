//! Core traits and types for secret storage

use thiserror::Error;

/// Errors that can occur while reading from a secret store
///
/// "Entry not found" is not an error: `lookup` returns `Ok(None)` for it.
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("Store not available: {0}")]
    NotAvailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Secret for {service}:{account} is not valid UTF-8")]
    InvalidEncoding { service: String, account: String },

    #[error("Store error: {0}")]
    Backend(String),
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// Read-only access to a service/account keyed secret store
///
/// Implementations:
/// - `SecurityCliStore`: macOS `security` command line tool
/// - `KeychainSecretStore`: native OS credential API via `keyring`
/// - `MemorySecretStore`: in-memory, for tests and embedding hosts
///
/// Service and account are data. An implementation that builds a command
/// line must quote them with [`crate::secrets::shell::quote`].
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Check if this store can be used on the current platform
    ///
    /// For example, the `security` tool only exists on macOS.
    fn is_available(&self) -> bool {
        true
    }

    /// Retrieve the raw secret stored under `service` and `account`
    ///
    /// Returns `Ok(None)` when the entry does not exist.
    fn lookup(&self, service: &str, account: &str) -> SecretStoreResult<Option<String>>;

    /// Check if an entry exists
    fn has(&self, service: &str, account: &str) -> bool {
        matches!(self.lookup(service, account), Ok(Some(_)))
    }
}
