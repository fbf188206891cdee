//! Keychain configuration source
//!
//! Credentials are stored as JSON objects in generic passwords:
//! - Service: `b2c-cli` (or `SFCC_KEYCHAIN_SERVICE`)
//! - Account: `*` for global defaults, or an instance name such as `staging`
//! - Password: the JSON record
//!
//! The `*` record is always loaded. An instance record, when one is
//! selected, overrides it field by field.

use std::sync::Arc;

use tracing::debug;

use crate::config::{
    ConfigError, ConfigResult, ConfigSource, ConfigSourcesHookResult, KeychainSettings,
};
use crate::secrets::{create_secret_store, fetch_config, SecretStore, GLOBAL_ACCOUNT};
use crate::types::{ConfigLoadResult, ResolveConfigOptions};

/// Separator between provenance tokens in `ConfigLoadResult::location`
pub const LOCATION_SEPARATOR: &str = ",";

/// Configuration source that reads credentials from the keychain
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use b2c_keychain_core::{ConfigSource, KeychainSource, KeychainSettings, MemorySecretStore, ResolveConfigOptions};
///
/// let store = Arc::new(MemorySecretStore::new());
/// store.insert("b2c-cli", "*", r#"{"clientId":"shared","defaultInstance":"staging"}"#);
/// store.insert("b2c-cli", "staging", r#"{"username":"u"}"#);
///
/// let source = KeychainSource::new(store, KeychainSettings::default());
/// let result = source.load(&ResolveConfigOptions::new()).unwrap();
/// assert_eq!(result.location, "keychain:b2c-cli:*,keychain:b2c-cli:staging");
/// ```
pub struct KeychainSource {
    store: Arc<dyn SecretStore>,
    settings: KeychainSettings,
}

impl KeychainSource {
    /// Name reported to the host pipeline
    pub const NAME: &'static str = "macos-keychain";

    pub fn new(store: Arc<dyn SecretStore>, settings: KeychainSettings) -> Self {
        Self { store, settings }
    }

    /// Build a source reading from the backend named in `settings`
    pub fn from_settings(settings: KeychainSettings) -> ConfigResult<Self> {
        let store = create_secret_store(&settings.backend, &settings)
            .ok_or_else(|| ConfigError::UnknownBackend(settings.backend.clone()))?;
        Ok(Self::new(store, settings))
    }

    /// Build a source from the settings file and environment
    pub fn discover() -> ConfigResult<Self> {
        Self::from_settings(KeychainSettings::discover()?)
    }

    pub fn settings(&self) -> &KeychainSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn SecretStore> {
        &self.store
    }

    fn location(&self, account: &str) -> String {
        format!("keychain:{}:{}", self.settings.service, account)
    }
}

impl std::fmt::Debug for KeychainSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeychainSource")
            .field("store", &self.store.name())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Pick the instance to load: explicit, then the global record's
/// `defaultInstance`, then the configured fallback. Empty names are skipped.
pub fn effective_instance<'a>(
    explicit: Option<&'a str>,
    global_default: Option<&'a str>,
    fallback: Option<&'a str>,
) -> Option<&'a str> {
    [explicit, global_default, fallback]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
}

impl ConfigSource for KeychainSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    /// Resolve the global and instance records and merge them
    ///
    /// 1. Bail out when the store cannot run on this platform
    /// 2. Load the `*` record
    /// 3. Pick the instance (`--instance` → `*.defaultInstance` → fallback)
    /// 4. Load the instance record
    /// 5. Merge, instance fields winning, without `defaultInstance`
    fn load(&self, options: &ResolveConfigOptions) -> Option<ConfigLoadResult> {
        if !self.store.is_available() {
            debug!(store = self.store.name(), "secret store not available on this platform");
            return None;
        }

        let service = self.settings.service.as_str();
        let mut locations = Vec::with_capacity(2);

        let global = fetch_config(self.store.as_ref(), service, GLOBAL_ACCOUNT);
        if global.is_some() {
            locations.push(self.location(GLOBAL_ACCOUNT));
        }

        let instance = effective_instance(
            options.instance.as_deref(),
            global.as_ref().and_then(|g| g.default_instance()),
            self.settings.fallback_instance.as_deref(),
        );
        debug!(service, instance = ?instance, "selected keychain instance");

        let instance_config = instance.and_then(|name| {
            let config = fetch_config(self.store.as_ref(), service, name)?;
            locations.push(self.location(name));
            Some(config)
        });

        if global.is_none() && instance_config.is_none() {
            debug!(service, "no keychain records found");
            return None;
        }

        // Instance keys overwrite global ones, `null` included. An instance
        // record's own defaultInstance has no effect.
        let mut merged = global.unwrap_or_default();
        if let Some(instance_config) = instance_config {
            merged.merge_from(instance_config);
        }

        Some(ConfigLoadResult {
            config: merged.into_config(),
            location: locations.join(LOCATION_SEPARATOR),
        })
    }

    fn path(&self) -> Option<String> {
        Some(format!("keychain:{}", self.settings.service))
    }
}

/// Sources this plugin contributes to the host pipeline
///
/// The host passes the settings it resolved, usually
/// `KeychainSettings::discover()`. The keychain source is placed after the
/// host's own sources unless the host decides otherwise.
pub fn keychain_sources_hook(settings: KeychainSettings) -> ConfigResult<ConfigSourcesHookResult> {
    let source: Arc<dyn ConfigSource> = Arc::new(KeychainSource::from_settings(settings)?);
    Ok(ConfigSourcesHookResult::new(vec![source]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::{MemorySecretStore, SecretStoreError, SecretStoreResult};
    use crate::types::NormalizedConfig;

    const GLOBAL_DEFAULTS: &str = r#"{"clientId":"shared","clientSecret":"shared-secret","defaultInstance":"staging"}"#;

    fn source_with(entries: &[(&str, &str)]) -> (Arc<MemorySecretStore>, KeychainSource) {
        let store = Arc::new(MemorySecretStore::new());
        for (account, secret) in entries {
            store.insert("b2c-cli", account, secret);
        }
        let source = KeychainSource::new(store.clone(), KeychainSettings::default());
        (store, source)
    }

    /// Counts lookups and fails for one account
    struct RecordingStore {
        inner: MemorySecretStore,
        failing_account: Option<&'static str>,
        lookups: std::sync::Mutex<Vec<String>>,
    }

    impl SecretStore for RecordingStore {
        fn name(&self) -> &str {
            "recording"
        }

        fn is_available(&self) -> bool {
            self.inner.is_available()
        }

        fn lookup(&self, service: &str, account: &str) -> SecretStoreResult<Option<String>> {
            self.lookups.lock().unwrap().push(account.to_string());
            if self.failing_account == Some(account) {
                return Err(SecretStoreError::Backend("keychain locked".to_string()));
            }
            self.inner.lookup(service, account)
        }
    }

    fn recording_store(entries: &[(&str, &str)], failing_account: Option<&'static str>) -> Arc<RecordingStore> {
        let inner = MemorySecretStore::new();
        for (account, secret) in entries {
            inner.insert("b2c-cli", account, secret);
        }
        Arc::new(RecordingStore {
            inner,
            failing_account,
            lookups: std::sync::Mutex::new(Vec::new()),
        })
    }

    #[test]
    fn test_name_and_path() {
        let (_, source) = source_with(&[]);
        assert_eq!(source.name(), "macos-keychain");
        assert_eq!(source.path().as_deref(), Some("keychain:b2c-cli"));
    }

    #[test]
    fn test_global_default_instance_selects_record() {
        let (_, source) = source_with(&[
            ("*", r#"{"clientId":"shared","defaultInstance":"staging"}"#),
            ("staging", r#"{"username":"u"}"#),
        ]);

        let result = source.load(&ResolveConfigOptions::new()).unwrap();
        assert_eq!(
            result.config,
            NormalizedConfig::new().with_client_id("shared").with_username("u")
        );
        assert_eq!(result.location, "keychain:b2c-cli:*,keychain:b2c-cli:staging");
        assert_eq!(
            serde_json::to_string(&result.config).unwrap(),
            r#"{"username":"u","clientId":"shared"}"#
        );
    }

    #[test]
    fn test_global_only() {
        let (_, source) = source_with(&[("*", r#"{"clientId":"shared","hostname":"h"}"#)]);

        let result = source.load(&ResolveConfigOptions::new()).unwrap();
        assert_eq!(
            result.config,
            NormalizedConfig::new().with_client_id("shared").with_hostname("h")
        );
        assert_eq!(result.location, "keychain:b2c-cli:*");
    }

    #[test]
    fn test_nothing_stored() {
        let (_, source) = source_with(&[]);
        assert!(source.load(&ResolveConfigOptions::new()).is_none());
        assert!(source.load(&ResolveConfigOptions::new().with_instance("prod")).is_none());

        let source = KeychainSource::new(
            Arc::new(MemorySecretStore::new()),
            KeychainSettings::default().with_fallback_instance("staging"),
        );
        assert!(source.load(&ResolveConfigOptions::new()).is_none());
    }

    #[test]
    fn test_explicit_instance_overrides_default_instance() {
        let store = recording_store(
            &[
                ("*", GLOBAL_DEFAULTS),
                ("staging", r#"{"hostname":"staging.example.com"}"#),
                ("prod", r#"{"hostname":"prod.example.com"}"#),
            ],
            None,
        );
        let source = KeychainSource::new(store.clone(), KeychainSettings::default());

        let result = source.load(&ResolveConfigOptions::new().with_instance("prod")).unwrap();
        assert_eq!(result.config.hostname.as_deref(), Some("prod.example.com"));
        assert_eq!(result.location, "keychain:b2c-cli:*,keychain:b2c-cli:prod");
        assert_eq!(*store.lookups.lock().unwrap(), vec!["*", "prod"]);
    }

    #[test]
    fn test_malformed_global_record() {
        let (_, source) = source_with(&[
            ("*", "{\"clientId\": oops"),
            ("staging", r#"{"password":"p"}"#),
        ]);

        let result = source.load(&ResolveConfigOptions::new().with_instance("staging")).unwrap();
        assert_eq!(result.config, NormalizedConfig::new().with_password("p"));
        assert_eq!(result.location, "keychain:b2c-cli:staging");
    }

    #[test]
    fn test_instance_precedence() {
        assert_eq!(effective_instance(Some("a"), Some("b"), Some("c")), Some("a"));
        assert_eq!(effective_instance(None, Some("b"), Some("c")), Some("b"));
        assert_eq!(effective_instance(None, None, Some("c")), Some("c"));
        assert_eq!(effective_instance(None, None, None), None);
        assert_eq!(effective_instance(Some(""), Some(""), Some("c")), Some("c"));
        assert_eq!(effective_instance(Some(""), None, None), None);
    }

    #[test]
    fn test_default_instance_beats_fallback() {
        let store = Arc::new(MemorySecretStore::new());
        store.insert("b2c-cli", "*", GLOBAL_DEFAULTS);
        store.insert("b2c-cli", "staging", r#"{"username":"staging-user"}"#);
        store.insert("b2c-cli", "sandbox", r#"{"username":"sandbox-user"}"#);
        let source = KeychainSource::new(
            store,
            KeychainSettings::default().with_fallback_instance("sandbox"),
        );

        let result = source.load(&ResolveConfigOptions::new()).unwrap();
        assert_eq!(result.config.username.as_deref(), Some("staging-user"));
    }

    #[test]
    fn test_fallback_instance_used_without_default() {
        let store = Arc::new(MemorySecretStore::new());
        store.insert("b2c-cli", "*", r#"{"clientId":"shared"}"#);
        store.insert("b2c-cli", "sandbox", r#"{"username":"sandbox-user"}"#);
        let source = KeychainSource::new(
            store,
            KeychainSettings::default().with_fallback_instance("sandbox"),
        );

        let result = source.load(&ResolveConfigOptions::new()).unwrap();
        assert_eq!(result.config.username.as_deref(), Some("sandbox-user"));
        assert_eq!(result.location, "keychain:b2c-cli:*,keychain:b2c-cli:sandbox");
    }

    #[test]
    fn test_fallback_instance_without_global_record() {
        let store = Arc::new(MemorySecretStore::new());
        store.insert("b2c-cli", "sandbox", r#"{"username":"sandbox-user"}"#);
        let source = KeychainSource::new(
            store,
            KeychainSettings::default().with_fallback_instance("sandbox"),
        );

        let result = source.load(&ResolveConfigOptions::new()).unwrap();
        assert_eq!(result.location, "keychain:b2c-cli:sandbox");
    }

    #[test]
    fn test_instance_fields_win_and_global_fills_in() {
        let (_, source) = source_with(&[
            ("*", r#"{"clientId":"shared","username":"global","password":"global-pw","scopes":["a","b"]}"#),
            ("staging", r#"{"username":"instance","password":"","scopes":["c"]}"#),
        ]);

        let config = source
            .load(&ResolveConfigOptions::new().with_instance("staging"))
            .unwrap()
            .config;
        assert_eq!(config.client_id.as_deref(), Some("shared"));
        assert_eq!(config.username.as_deref(), Some("instance"));
        assert_eq!(config.password.as_deref(), Some(""));
        assert_eq!(config.scopes, Some(vec!["c".to_string()]));
    }

    #[test]
    fn test_instance_null_clears_global_value() {
        let (_, source) = source_with(&[
            ("*", r#"{"username":"global","clientId":"shared"}"#),
            ("staging", r#"{"username":null}"#),
        ]);

        let result = source.load(&ResolveConfigOptions::new().with_instance("staging")).unwrap();
        assert_eq!(result.config, NormalizedConfig::new().with_client_id("shared"));
        assert_eq!(result.location, "keychain:b2c-cli:*,keychain:b2c-cli:staging");
        assert_eq!(
            serde_json::to_value(&result.config).unwrap(),
            serde_json::json!({"clientId": "shared"})
        );
    }

    #[test]
    fn test_mistyped_instance_field_keeps_rest_of_record() {
        let (_, source) = source_with(&[
            ("*", r#"{"clientId":"shared","scopes":["global.scope"]}"#),
            ("staging", r#"{"username":"u","password":"p","scopes":"sfcc.products"}"#),
        ]);

        let result = source.load(&ResolveConfigOptions::new().with_instance("staging")).unwrap();
        assert_eq!(result.config.client_id.as_deref(), Some("shared"));
        assert_eq!(result.config.username.as_deref(), Some("u"));
        assert_eq!(result.config.password.as_deref(), Some("p"));
        assert_eq!(result.config.scopes, None);
        assert_eq!(result.location, "keychain:b2c-cli:*,keychain:b2c-cli:staging");
    }

    #[test]
    fn test_default_instance_never_in_result() {
        let (_, source) = source_with(&[
            ("*", r#"{"defaultInstance":"staging"}"#),
            ("staging", r#"{"defaultInstance":"prod","username":"u"}"#),
        ]);

        let result = source.load(&ResolveConfigOptions::new()).unwrap();
        let json = serde_json::to_value(&result.config).unwrap();
        assert!(json.get("defaultInstance").is_none());
        assert_eq!(json, serde_json::json!({"username": "u"}));
    }

    #[test]
    fn test_instance_default_instance_is_not_followed() {
        let store = recording_store(
            &[("staging", r#"{"defaultInstance":"prod"}"#), ("prod", r#"{"username":"p"}"#)],
            None,
        );
        let source = KeychainSource::new(store.clone(), KeychainSettings::default());

        let result = source.load(&ResolveConfigOptions::new().with_instance("staging")).unwrap();
        assert!(result.config.is_empty());
        assert_eq!(result.location, "keychain:b2c-cli:staging");
        assert_eq!(*store.lookups.lock().unwrap(), vec!["*", "staging"]);
    }

    #[test]
    fn test_empty_global_record_is_present() {
        let (_, source) = source_with(&[("*", "{}")]);
        let result = source.load(&ResolveConfigOptions::new()).unwrap();
        assert!(result.config.is_empty());
        assert_eq!(result.location, "keychain:b2c-cli:*");
    }

    #[test]
    fn test_store_failure_treated_as_absent_tier() {
        let store = recording_store(
            &[("*", GLOBAL_DEFAULTS), ("staging", r#"{"username":"u"}"#)],
            Some("*"),
        );
        let source = KeychainSource::new(store, KeychainSettings::default());

        assert!(source.load(&ResolveConfigOptions::new()).is_none());
        let result = source.load(&ResolveConfigOptions::new().with_instance("staging")).unwrap();
        assert_eq!(result.location, "keychain:b2c-cli:staging");
    }

    #[test]
    fn test_unavailable_store_is_not_queried() {
        let store = recording_store(&[("*", GLOBAL_DEFAULTS)], None);
        store.inner.set_available(false);
        let source = KeychainSource::new(store.clone(), KeychainSettings::default());

        assert!(source.load(&ResolveConfigOptions::new().with_instance("staging")).is_none());
        assert!(store.lookups.lock().unwrap().is_empty());
    }

    #[test]
    fn test_no_instance_means_single_lookup() {
        let store = recording_store(&[("*", r#"{"clientId":"shared"}"#)], None);
        let source = KeychainSource::new(store.clone(), KeychainSettings::default());

        source.load(&ResolveConfigOptions::new()).unwrap();
        assert_eq!(*store.lookups.lock().unwrap(), vec!["*"]);
    }

    #[test]
    fn test_each_load_requeries_store() {
        let (store, source) = source_with(&[("*", r#"{"clientId":"one"}"#)]);
        let first = source.load(&ResolveConfigOptions::new()).unwrap();
        store.insert("b2c-cli", "*", r#"{"clientId":"two"}"#);
        let second = source.load(&ResolveConfigOptions::new()).unwrap();

        assert_eq!(first.config.client_id.as_deref(), Some("one"));
        assert_eq!(second.config.client_id.as_deref(), Some("two"));
    }

    #[test]
    fn test_custom_service_name() {
        let store = Arc::new(MemorySecretStore::new());
        store.insert("my-cli", "*", r#"{"clientId":"x"}"#);
        store.insert("b2c-cli", "*", r#"{"clientId":"wrong"}"#);
        let source = KeychainSource::new(store, KeychainSettings::default().with_service("my-cli"));

        let result = source.load(&ResolveConfigOptions::new()).unwrap();
        assert_eq!(result.config.client_id.as_deref(), Some("x"));
        assert_eq!(result.location, "keychain:my-cli:*");
    }

    #[test]
    fn test_instance_name_with_quote() {
        let (_, source) = source_with(&[("it's-a-test", r#"{"username":"quoted"}"#)]);
        let result = source
            .load(&ResolveConfigOptions::new().with_instance("it's-a-test"))
            .unwrap();
        assert_eq!(result.config.username.as_deref(), Some("quoted"));
        assert_eq!(result.location, "keychain:b2c-cli:it's-a-test");
    }

    #[test]
    fn test_from_settings_uses_registered_backend() {
        let source = KeychainSource::from_settings(KeychainSettings::default().with_backend("memory")).unwrap();
        assert_eq!(source.store().name(), "memory");

        let err = KeychainSource::from_settings(KeychainSettings::default().with_backend("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBackend(name) if name == "nope"));
    }

    #[test]
    fn test_sources_hook_contributes_keychain_source() {
        let settings = KeychainSettings::default().with_service("hook-test").with_backend("memory");
        let result = keychain_sources_hook(settings).unwrap();
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].name(), "macos-keychain");
        assert_eq!(result.sources[0].path().as_deref(), Some("keychain:hook-test"));
        assert!(result.priority.is_none());
    }

    #[test]
    fn test_sources_hook_unknown_backend() {
        let settings = KeychainSettings::default().with_backend("nope");
        assert!(matches!(
            keychain_sources_hook(settings),
            Err(ConfigError::UnknownBackend(name)) if name == "nope"
        ));
    }
}
