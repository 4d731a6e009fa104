//! Configuration file support
//!
//! Settings come from an optional TOML file and are overridden by command
//! line flags:
//!
//! ```toml
//! [server]
//! port = 8080
//! bind = "0.0.0.0"
//! workers = 4
//! upload_limit_mb = 50
//! cors = true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::web::ServerConfig;

/// Directory name under the platform config dir
const CONFIG_DIR_NAME: &str = "html2pdf-service";

/// File name of the configuration file
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Contents of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerSection,
}

/// `[server]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub workers: Option<usize>,
    pub upload_limit_mb: Option<usize>,
    pub cors: Option<bool>,
}

/// Values given on the command line; `None` leaves the file value in place
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub workers: Option<usize>,
    pub upload_limit_mb: Option<usize>,
    pub cors: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Config {
    /// Default config file location, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the config from the default location
    ///
    /// A missing file is not an error and yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load the config from an explicit path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse the config from TOML text
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Resolve the final server config (CLI takes precedence over the file)
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> ServerConfig {
        let file = &self.server;
        let mut config = ServerConfig::default();

        if let Some(port) = cli.port.or(file.port) {
            config = config.with_port(port);
        }
        if let Some(bind) = cli.bind.as_ref().or(file.bind.as_ref()) {
            config = config.with_bind(bind.as_str());
        }
        if let Some(workers) = cli.workers.or(file.workers) {
            config = config.with_workers(workers);
        }
        if let Some(mb) = cli.upload_limit_mb.or(file.upload_limit_mb) {
            config = config.with_upload_limit(mb.saturating_mul(1024 * 1024));
        }
        if let Some(cors) = cli.cors.or(file.cors) {
            config = config.with_cors(cors);
        }

        config
    }
}
