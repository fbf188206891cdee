//! System keychain secret store
//!
//! Uses the OS credential API directly through the `keyring` crate:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use keyring::Entry;
use tracing::debug;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

const AVAILABILITY_CHECK_SERVICE: &str = "b2c-cli";
const AVAILABILITY_CHECK_ACCOUNT: &str = "__b2c_keychain_availability_check__";

/// Whether a read reached the credential store, whatever it found there
fn reached_store<T>(result: &keyring::Result<T>) -> bool {
    !matches!(
        result,
        Err(keyring::Error::NoStorageAccess(_)) | Err(keyring::Error::PlatformFailure(_))
    )
}

/// Secret store backed by the native credential API
///
/// Service and account go straight to the platform API as values, so no
/// quoting is involved.
///
/// # Example
///
/// ```no_run
/// use b2c_keychain_core::secrets::{KeychainSecretStore, SecretStore};
///
/// let store = KeychainSecretStore::new();
/// let json = store.lookup("b2c-cli", "*").unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KeychainSecretStore;

impl KeychainSecretStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(service: &str, account: &str) -> SecretStoreResult<Entry> {
        Entry::new(service, account)
            .map_err(|e| SecretStoreError::Backend(format!("Failed to create keychain entry: {}", e)))
    }
}

impl SecretStore for KeychainSecretStore {
    fn name(&self) -> &str {
        "keyring"
    }

    fn is_available(&self) -> bool {
        // Entry::new only builds a handle, so read a dummy entry. NoEntry
        // still means the store answered.
        let result = Entry::new(AVAILABILITY_CHECK_SERVICE, AVAILABILITY_CHECK_ACCOUNT)
            .and_then(|entry| entry.get_password());
        let available = reached_store(&result);
        if !available {
            debug!("keyring backend unavailable");
        }
        available
    }

    fn lookup(&self, service: &str, account: &str) -> SecretStoreResult<Option<String>> {
        let entry = Self::entry(service, account)?;
        match entry.get_password() {
            Ok(password) => {
                debug!(service, account, len = password.len(), "keyring entry found");
                Ok(Some(password))
            }
            Err(keyring::Error::NoEntry) => {
                debug!(service, account, "keyring entry not found");
                Ok(None)
            }
            Err(keyring::Error::BadEncoding(_)) => Err(SecretStoreError::InvalidEncoding {
                service: service.to_string(),
                account: account.to_string(),
            }),
            Err(keyring::Error::NoStorageAccess(e)) => {
                Err(SecretStoreError::NotAvailable(format!("keychain not accessible: {}", e)))
            }
            Err(e) => Err(SecretStoreError::Backend(format!("Failed to read from keychain: {}", e))),
        }
    }
}
