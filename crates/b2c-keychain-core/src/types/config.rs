//! Credential record types

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the meta-field selecting the default instance
pub const DEFAULT_INSTANCE_KEY: &str = "defaultInstance";

/// Keep a field only when its JSON value has the expected type
///
/// A mistyped or `null` value becomes `None` without failing the rest of
/// the record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Normalized configuration fields a keychain record can supply
///
/// Every field is optional. A record with no fields set is still a present
/// record; absence of a field only means "not supplied by this record".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedConfig {
    /// Instance hostname
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Separate WebDAV hostname, when it differs from `hostname`
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub webdav_hostname: Option<String>,
    /// Code version to deploy to
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub code_version: Option<String>,
    /// Basic auth username
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Basic auth password or access key
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// OAuth client ID
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// OAuth client secret
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// OAuth scopes
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    /// SCAPI short code
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    /// Managed Runtime project
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mrt_project: Option<String>,
    /// Managed Runtime environment
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mrt_environment: Option<String>,
    /// Managed Runtime API key
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mrt_api_key: Option<String>,
    /// Account Manager host
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub account_manager_host: Option<String>,
}

impl NormalizedConfig {
    /// Create an empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed view of a JSON object
    ///
    /// Unknown keys are ignored; mistyped or `null` fields are left unset.
    pub fn from_map(map: Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(map)).unwrap_or_default()
    }

    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = Some(scopes);
        self
    }
}

/// A record as stored in the keychain: any JSON object
///
/// Kept untyped until the merge is done, so an explicit `null` in an
/// instance record still overrides the global value. The `defaultInstance`
/// meta-field only has meaning on the global (`*`) account and never
/// appears in a resolved config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct KeychainConfig {
    fields: Map<String, Value>,
}

impl KeychainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `defaultInstance` meta-field, when it is a string
    pub fn default_instance(&self) -> Option<&str> {
        self.fields.get(DEFAULT_INSTANCE_KEY).and_then(Value::as_str)
    }

    /// Raw value of a field, `Some(Value::Null)` for an explicit `null`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Overlay every key present in `other`, `null` included
    ///
    /// Shallow and last-writer-wins: lists and nested objects are replaced,
    /// not merged.
    pub fn merge_from(&mut self, other: KeychainConfig) {
        self.fields.extend(other.fields);
    }

    /// Drop the meta-field and type the remaining fields
    pub fn into_config(mut self) -> NormalizedConfig {
        self.fields.remove(DEFAULT_INSTANCE_KEY);
        NormalizedConfig::from_map(self.fields)
    }
}

impl From<Map<String, Value>> for KeychainConfig {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
