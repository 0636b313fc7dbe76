//! Application configuration lookups and the mail service settings read from them.

#[cfg(feature = "parse-cfg")]
pub mod config_file;

use crate::{Error, LIB_LOG_TARGET};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::error;
use url::Url;

/// Application id the configuration keys are stored under.
pub const APP_ID: &str = "nc_ionos_processes";

/// Key holding the mail service base URL.
pub const KEY_MAIL_BASE_URL: &str = "ionos_mail_base_url";
/// Key holding the basic auth user.
pub const KEY_BASIC_AUTH_USER: &str = "basic_auth_user";
/// Key holding the basic auth password.
pub const KEY_BASIC_AUTH_PASS: &str = "basic_auth_pass";
/// Key disabling TLS certificate verification when true.
pub const KEY_ALLOW_INSECURE: &str = "allow_insecure";
/// Key holding the mail API request timeout in seconds.
pub const KEY_MAIL_API_TIMEOUT: &str = "mail_api_timeout";

const DEFAULT_TIMEOUT_SECS: i64 = 30;

/// Typed key-value lookups provided by the host.
///
/// Missing keys return the given default. Implementations are expected to be cheap enough
/// to be queried on every dispatch.
pub trait AppConfig: Send + Sync {
    /// Look up a string value.
    fn get_value_string(&self, app: &str, key: &str, default: &str) -> String;

    /// Look up a boolean value.
    fn get_value_bool(&self, app: &str, key: &str, default: bool) -> bool;

    /// Look up an integer value.
    fn get_value_int(&self, app: &str, key: &str, default: i64) -> i64;
}

/// A single stored configuration value.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// String value.
    String(String),
}

/// [`AppConfig`] kept in memory.
#[derive(Debug, Default)]
pub struct MemoryAppConfig {
    values: RwLock<HashMap<(String, String), ConfigValue>>,
}

impl MemoryAppConfig {
    /// Create an empty `MemoryAppConfig`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value for `app` and `key`, replacing any previous value.
    pub fn set_value<S: AsRef<str>>(&self, app: S, key: S, value: ConfigValue) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert((app.as_ref().into(), key.as_ref().into()), value);
    }

    fn get(&self, app: &str, key: &str) -> Option<ConfigValue> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.get(&(app.to_string(), key.to_string())).cloned()
    }
}

impl AppConfig for MemoryAppConfig {
    fn get_value_string(&self, app: &str, key: &str, default: &str) -> String {
        match self.get(app, key) {
            Some(ConfigValue::String(value)) => value,
            Some(ConfigValue::Int(value)) => value.to_string(),
            Some(ConfigValue::Bool(value)) => value.to_string(),
            None => default.to_string(),
        }
    }

    fn get_value_bool(&self, app: &str, key: &str, default: bool) -> bool {
        match self.get(app, key) {
            Some(ConfigValue::Bool(value)) => value,
            Some(ConfigValue::Int(value)) => value != 0,
            Some(ConfigValue::String(value)) => {
                matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
            }
            None => default,
        }
    }

    fn get_value_int(&self, app: &str, key: &str, default: i64) -> i64 {
        match self.get(app, key) {
            Some(ConfigValue::Int(value)) => value,
            Some(ConfigValue::String(value)) => value.trim().parse().unwrap_or(default),
            Some(ConfigValue::Bool(_)) | None => default,
        }
    }
}

/// Connection settings for the mail notification service.
#[derive(Clone, PartialEq, Eq)]
pub struct MailServiceConfig {
    base_url: String,
    allow_insecure_tls: bool,
    auth_user: String,
    auth_password: String,
    timeout: Duration,
}

impl MailServiceConfig {
    /// Read the current settings from an [`AppConfig`].
    pub fn load(config: &dyn AppConfig) -> Self {
        let timeout = config.get_value_int(APP_ID, KEY_MAIL_API_TIMEOUT, DEFAULT_TIMEOUT_SECS);
        let timeout = match u64::try_from(timeout) {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS as u64),
        };

        Self {
            base_url: config.get_value_string(APP_ID, KEY_MAIL_BASE_URL, ""),
            allow_insecure_tls: config.get_value_bool(APP_ID, KEY_ALLOW_INSECURE, false),
            auth_user: config.get_value_string(APP_ID, KEY_BASIC_AUTH_USER, ""),
            auth_password: config.get_value_string(APP_ID, KEY_BASIC_AUTH_PASS, ""),
            timeout,
        }
    }

    /// Check that base URL, user and password are all set, in that order.
    pub fn validate(&self) -> Result<(), Error> {
        if self.base_url.is_empty() {
            error!(target: LIB_LOG_TARGET, "No mailer service configured");
            return Err(Error::MissingMailerServiceUrl);
        }

        if self.auth_user.is_empty() {
            error!(target: LIB_LOG_TARGET, "No mailer user configured");
            return Err(Error::MissingMailerUser);
        }

        if self.auth_password.is_empty() {
            error!(target: LIB_LOG_TARGET, "No mailer service pass configured");
            return Err(Error::MissingMailerPassword);
        }

        Ok(())
    }

    /// Return the mail service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Return whether TLS certificate verification is disabled.
    pub fn allow_insecure_tls(&self) -> bool {
        self.allow_insecure_tls
    }

    /// Return the basic auth user.
    pub fn auth_user(&self) -> &str {
        &self.auth_user
    }

    /// Return the basic auth password.
    pub fn auth_password(&self) -> &str {
        &self.auth_password
    }

    /// Return the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for MailServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailServiceConfig")
            .field("base_url", &self.base_url)
            .field("allow_insecure_tls", &self.allow_insecure_tls)
            .field("auth_user", &self.auth_user)
            .field("auth_password", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Host side settings used when running outside of a host: public base URL, language and routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfiguration {
    base_url: Url,
    language: String,
    routes: HashMap<String, String>,
}

impl HostConfiguration {
    /// Create a new `HostConfiguration`.
    pub fn new(base_url: &str, language: &str, routes: HashMap<String, String>) -> Result<Self, Error> {
        if language.is_empty() {
            return Err(Error::InvalidConfigValue("host language is blank".to_string()));
        }
        let base_url = Url::parse(base_url)?;
        Ok(Self { base_url, language: language.to_string(), routes })
    }

    /// Return the public base URL of the host.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the language code.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Return route templates that override the defaults.
    pub fn routes(&self) -> &HashMap<String, String> {
        &self.routes
    }
}
