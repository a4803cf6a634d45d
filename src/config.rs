// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broker and application configuration.
//!
//! Nothing about the broker is compiled in: the endpoint and credentials
//! come from a [`BrokerConfig`], built in code or loaded as part of an
//! [`AppConfig`] JSON file.
//!
//! ```json
//! {
//!   "broker": {
//!     "host": "broker.example.com",
//!     "port": 8884,
//!     "path": "/mqtt",
//!     "tls": true,
//!     "credentials": { "username": "user", "password": "secret" }
//!   },
//!   "devices": [
//!     { "id": "1", "name": "Cooler", "topic": "home/cooler" }
//!   ]
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::registry::{Device, DeviceRegistry};

const DEFAULT_PORT: u16 = 8884;
const DEFAULT_PATH: &str = "/mqtt";
const DEFAULT_KEEP_ALIVE_SECS: u64 = 30;

/// Static username/password pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Broker username.
    pub username: String,
    /// Broker password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Connection parameters for the MQTT broker.
///
/// # Examples
///
/// ```
/// use home_switches::config::BrokerConfig;
///
/// let config = BrokerConfig::builder()
///     .host("broker.example.com")
///     .credentials("user", "secret")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.port(), 8884);
/// assert_eq!(config.path(), "/mqtt");
/// assert!(config.tls());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerConfig {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_path")]
    path: String,
    #[serde(default = "default_tls")]
    tls: bool,
    #[serde(default)]
    credentials: Option<Credentials>,
    #[serde(default = "default_keep_alive_secs")]
    keep_alive_secs: u64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

fn default_tls() -> bool {
    true
}

fn default_keep_alive_secs() -> u64 {
    DEFAULT_KEEP_ALIVE_SECS
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            path: default_path(),
            tls: true,
            credentials: None,
            keep_alive_secs: DEFAULT_KEEP_ALIVE_SECS,
        }
    }
}

impl BrokerConfig {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn builder() -> BrokerConfigBuilder {
        BrokerConfigBuilder::default()
    }

    /// Returns the broker host name.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the broker port (default 8884).
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the WebSocket path (default `/mqtt`). Empty means plain MQTT.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns whether the connection is encrypted (default `true`).
    #[must_use]
    pub fn tls(&self) -> bool {
        self.tls
    }

    /// Returns the credentials, if configured.
    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the keep-alive interval (default 30 seconds).
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    /// Checks that the configuration can be used to connect.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHost`] if no host is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingHost);
        }
        Ok(())
    }
}

/// Builder for [`BrokerConfig`].
#[derive(Debug, Default)]
pub struct BrokerConfigBuilder {
    config: BrokerConfig,
}

impl BrokerConfigBuilder {
    /// Sets the broker host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the broker port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the WebSocket path. Pass `""` to use MQTT directly over TCP.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Enables or disables TLS.
    #[must_use]
    pub fn tls(mut self, tls: bool) -> Self {
        self.config.tls = tls;
        self
    }

    /// Sets static credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Sets the keep-alive interval, rounded down to whole seconds.
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive_secs = duration.as_secs();
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHost`] if no host was set.
    pub fn build(self) -> Result<BrokerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Contents of the application configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Broker connection parameters.
    pub broker: BrokerConfig,
    /// Devices to show; the default home set when absent.
    #[serde(default)]
    pub devices: Option<Vec<Device>>,
}

impl AppConfig {
    /// Returns the default configuration file location, if the platform has one.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("home-switches");
            path.push("config.json");
            path
        })
    }

    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the JSON is malformed or the broker
    /// section is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.broker.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Builds the device registry described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configured devices are not a valid
    /// registry.
    pub fn registry(&self) -> Result<DeviceRegistry, ConfigError> {
        match &self.devices {
            Some(devices) => DeviceRegistry::new(devices.clone()),
            None => Ok(DeviceRegistry::home()),
        }
    }
}
