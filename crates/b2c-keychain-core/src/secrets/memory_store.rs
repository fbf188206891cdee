//! In-memory secret store

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

/// In-memory secret store keyed by (service, account)
///
/// Used by tests and by hosts that already hold credentials in memory.
/// Availability can be switched off to stand in for an unsupported
/// platform.
///
/// # Example
///
/// ```
/// use b2c_keychain_core::secrets::{SecretStore, MemorySecretStore};
///
/// let store = MemorySecretStore::new();
/// store.insert("b2c-cli", "staging", r#"{"username":"u"}"#);
/// assert!(store.has("b2c-cli", "staging"));
/// ```
#[derive(Debug)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<(String, String), String>>,
    available: AtomicBool,
}

impl MemorySecretStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Add or replace an entry
    pub fn insert(&self, service: &str, account: &str, secret: &str) {
        if let Ok(mut secrets) = self.secrets.write() {
            secrets.insert((service.to_string(), account.to_string()), secret.to_string());
        }
    }

    /// Remove an entry, returning whether it existed
    pub fn remove(&self, service: &str, account: &str) -> bool {
        self.secrets
            .write()
            .map(|mut secrets| secrets.remove(&(service.to_string(), account.to_string())).is_some())
            .unwrap_or(false)
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.secrets.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mark the store as (un)available on this platform
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl Default for MemorySecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn lookup(&self, service: &str, account: &str) -> SecretStoreResult<Option<String>> {
        let secrets = self
            .secrets
            .read()
            .map_err(|_| SecretStoreError::Backend("memory store lock poisoned".to_string()))?;
        Ok(secrets.get(&(service.to_string(), account.to_string())).cloned())
    }
}
