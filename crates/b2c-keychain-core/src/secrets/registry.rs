//! Secret store registry for discovering and creating backends by name

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::config::KeychainSettings;

use super::keychain_store::KeychainSecretStore;
use super::memory_store::MemorySecretStore;
use super::security_cli_store::SecurityCliStore;
use super::traits::SecretStore;

/// Factory function type for creating secret stores from the active settings
pub type StoreFactory = Box<dyn Fn(&KeychainSettings) -> Arc<dyn SecretStore> + Send + Sync>;

/// Definition of a registered secret store
pub struct StoreDefinition {
    /// Unique name for this store
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Factory function to create instances
    pub factory: StoreFactory,
}

impl std::fmt::Debug for StoreDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

fn builtin(name: &str, description: &str, factory: StoreFactory) -> (String, StoreDefinition) {
    (
        name.to_string(),
        StoreDefinition {
            name: name.to_string(),
            description: description.to_string(),
            factory,
        },
    )
}

/// Global registry of secret store backends
static REGISTRY: Lazy<RwLock<HashMap<String, StoreDefinition>>> = Lazy::new(|| {
    let map = HashMap::from([
        builtin(
            "security",
            "macOS Keychain via the security command line tool",
            Box::new(|settings| {
                let store = match &settings.program {
                    Some(program) => SecurityCliStore::with_program(program.clone()),
                    None => SecurityCliStore::new(),
                };
                Arc::new(store) as Arc<dyn SecretStore>
            }),
        ),
        builtin(
            "keyring",
            "Native credential API (macOS Keychain, Windows Credential Manager, Linux Secret Service)",
            Box::new(|_| Arc::new(KeychainSecretStore::new()) as Arc<dyn SecretStore>),
        ),
        builtin(
            "memory",
            "In-memory storage for testing",
            Box::new(|_| Arc::new(MemorySecretStore::new()) as Arc<dyn SecretStore>),
        ),
    ]);
    RwLock::new(map)
});

/// Register a secret store backend, replacing any with the same name
///
/// # Example
///
/// ```
/// use b2c_keychain_core::config::KeychainSettings;
/// use b2c_keychain_core::secrets::{register_secret_store, create_secret_store, MemorySecretStore, SecretStore};
/// use std::sync::Arc;
///
/// register_secret_store(
///     "fixture",
///     "Preloaded fixture",
///     Box::new(|_| Arc::new(MemorySecretStore::new()) as Arc<dyn SecretStore>),
/// );
/// assert!(create_secret_store("fixture", &KeychainSettings::default()).is_some());
/// ```
pub fn register_secret_store(name: &str, description: &str, factory: StoreFactory) {
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    registry.insert(
        name.to_string(),
        StoreDefinition {
            name: name.to_string(),
            description: description.to_string(),
            factory,
        },
    );
}

/// Create a secret store by name, configured from `settings`
///
/// Returns `None` if the name is not registered.
pub fn create_secret_store(name: &str, settings: &KeychainSettings) -> Option<Arc<dyn SecretStore>> {
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    registry.get(name).map(|def| (def.factory)(settings))
}

/// List all registered secret stores as (name, description), sorted by name
pub fn list_secret_stores() -> Vec<(String, String)> {
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    let mut stores: Vec<_> = registry
        .values()
        .map(|def| (def.name.clone(), def.description.clone()))
        .collect();
    stores.sort();
    stores
}

/// Check if a store is registered
pub fn has_secret_store(name: &str) -> bool {
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    registry.contains_key(name)
}

/// Unregister a secret store (mainly for testing)
pub fn unregister_secret_store(name: &str) -> bool {
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    registry.remove(name).is_some()
}
