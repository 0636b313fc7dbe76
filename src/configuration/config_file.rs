//! TOML configuration file support.

use crate::configuration::{APP_ID, ConfigValue, HostConfiguration, MemoryAppConfig};
use crate::Error;
use serde::Deserialize;
use std::collections::HashMap;

/// Configuration parsed from TOML.
///
/// ```toml
/// [app]
/// ionos_mail_base_url = "https://mail-api.example.com"
/// basic_auth_user = "user"
/// basic_auth_pass = "pass"
/// allow_insecure = false
/// mail_api_timeout = 30
///
/// [host]
/// base_url = "https://cloud.example.com"
/// language = "de"
///
/// [host.routes]
/// "files_sharing.sharecontroller.showShare" = "/s/{token}"
/// ```
#[derive(Deserialize, Debug)]
pub struct ConfigFileParser {
    #[serde(default)]
    app: HashMap<String, ConfigValue>,
    host: HostConfigFile,
}

/// Serde compatible representation of [`HostConfiguration`].
#[derive(Deserialize, Debug)]
pub struct HostConfigFile {
    base_url: String,
    #[serde(default = "default_language")]
    language: String,
    #[serde(default)]
    routes: HashMap<String, String>,
}

/// Everything needed to run the relay outside of a host.
#[derive(Debug)]
pub struct Configuration {
    app_config: MemoryAppConfig,
    host: HostConfiguration,
}

fn default_language() -> String {
    "en".to_string()
}

impl ConfigFileParser {
    /// Parse [`Configuration`] from provided TOML.
    pub fn from(string: &str) -> Result<Configuration, Error> {
        let parsed: ConfigFileParser = toml::from_str(string)?;
        parsed.try_into()
    }
}

impl TryFrom<ConfigFileParser> for Configuration {
    type Error = Error;

    fn try_from(value: ConfigFileParser) -> Result<Self, Self::Error> {
        let host = HostConfiguration::new(value.host.base_url.as_str(), value.host.language.as_str(), value.host.routes)?;
        let app_config = MemoryAppConfig::new();
        for (key, config_value) in value.app {
            app_config.set_value(APP_ID, key.as_str(), config_value);
        }
        Ok(Self { app_config, host })
    }
}

impl TryFrom<&str> for Configuration {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ConfigFileParser::from(value)
    }
}

impl Configuration {
    /// Return the application key-value store.
    pub fn app_config(&self) -> &MemoryAppConfig {
        &self.app_config
    }

    /// Return the host settings.
    pub fn host(&self) -> &HostConfiguration {
        &self.host
    }

    /// Split into the application key-value store and the host settings.
    pub fn into_parts(self) -> (MemoryAppConfig, HostConfiguration) {
        (self.app_config, self.host)
    }
}
