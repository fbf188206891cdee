//! Secret storage abstractions and implementations
//!
//! This module is the store accessor tier:
//! - `SecretStore` trait, an opaque `lookup(service, account)`
//! - Backends: `SecurityCliStore`, `KeychainSecretStore`, `MemorySecretStore`
//! - A registry for creating backends by name
//! - `fetch_config`, which turns an entry into a credential record

mod traits;
mod security_cli_store;
mod keychain_store;
mod memory_store;
mod registry;
mod fetch;
pub mod shell;

pub use traits::{SecretStore, SecretStoreError, SecretStoreResult};
pub use security_cli_store::SecurityCliStore;
pub use keychain_store::KeychainSecretStore;
pub use memory_store::MemorySecretStore;
pub use registry::{
    register_secret_store, create_secret_store, list_secret_stores,
    has_secret_store, unregister_secret_store, StoreDefinition, StoreFactory,
};
pub use fetch::{fetch_config, GLOBAL_ACCOUNT};
