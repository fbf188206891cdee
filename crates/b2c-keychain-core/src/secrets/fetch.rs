//! Fetch a keychain entry and parse it as a credential record

use tracing::{debug, warn};

use super::traits::{SecretStore, SecretStoreError};
use crate::types::KeychainConfig;

/// Account name holding the global defaults
pub const GLOBAL_ACCOUNT: &str = "*";

/// Look up `service`/`account` and parse the secret as a JSON record
///
/// Returns `None` when the entry is missing, empty, unreadable or not a
/// JSON object. A broken entry is treated the same as no entry so one bad
/// record cannot fail a whole resolution. Field types are not checked here.
pub fn fetch_config(store: &dyn SecretStore, service: &str, account: &str) -> Option<KeychainConfig> {
    let secret = match store.lookup(service, account) {
        Ok(Some(secret)) => secret,
        Ok(None) => {
            debug!(store = store.name(), service, account, "no keychain entry");
            return None;
        }
        Err(e @ SecretStoreError::Backend(_)) => {
            warn!(store = store.name(), service, account, error = %e, "keychain lookup failed");
            return None;
        }
        Err(e @ SecretStoreError::NotAvailable(_)) => {
            debug!(store = store.name(), service, account, error = %e, "secret store not available");
            return None;
        }
        Err(e) => {
            debug!(store = store.name(), service, account, error = %e, "keychain entry unreadable");
            return None;
        }
    };

    if secret.is_empty() {
        debug!(service, account, "keychain entry is empty");
        return None;
    }

    match serde_json::from_str::<KeychainConfig>(&secret) {
        Ok(config) => Some(config),
        Err(e) => {
            // Only the serde position goes to the log, never the content
            debug!(service, account, line = e.line(), column = e.column(), "keychain entry is not a JSON object");
            None
        }
    }
}
