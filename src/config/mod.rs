//! Configuration module

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub connection: ConnectionParams,
}

/// SSH connection parameters for one access point.
///
/// Immutable once handed to [`crate::UnifiAp`]. Whether `password` or
/// `key_file` is actually usable is left to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionParams {
    pub host: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub key_file: Option<PathBuf>,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds. Used as ssh's `ConnectTimeout` and also as the limit on the
    /// whole command run, so a slow `mca-dump` counts against it.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl ConnectionParams {
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: None,
            key_file: None,
            port: default_port(),
            timeout: default_timeout(),
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_key_file(mut self, key_file: impl Into<PathBuf>) -> Self {
        self.key_file = Some(key_file.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }
}

fn default_port() -> u16 {
    22
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load from `config/default.*` (optional) and `UNIFI_AP__*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("UNIFI_AP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Load from an explicit file, environment variables still override
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("UNIFI_AP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
