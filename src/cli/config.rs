//! Configuration file
//!
//! ```json
//! {
//!   "dataset_path": "./folhas_dataset.csv",
//!   "server": { "host": "0.0.0.0", "port": 5000, "cors_origins": [] },
//!   "log_level": "info",
//!   "log_format": "text"
//! }
//! ```
//!
//! Every field is optional. With no config file at all, the defaults apply.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::observability::LogFormat;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Dataset file (default "./folhas_dataset.csv")
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    #[serde(default)]
    pub server: HttpServerConfig,

    /// Log filter directive, overridden by RUST_LOG (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "text" or "json" (default "text")
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("./folhas_dataset.csv")
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            server: HttpServerConfig::default(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> CliResult<()> {
        if self.dataset_path.as_os_str().is_empty() {
            return Err(CliError::config_error("dataset_path must not be empty"));
        }

        if self.server.port == 0 {
            return Err(CliError::config_error("server.port must be > 0"));
        }

        if self.server.host.trim().is_empty() {
            return Err(CliError::config_error("server.host must not be empty"));
        }

        self.log_format()?;

        EnvFilter::try_new(&self.log_level).map_err(|e| {
            CliError::config_error(format!("Invalid log_level '{}': {}", self.log_level, e))
        })?;

        Ok(())
    }

    /// Parsed log format
    pub fn log_format(&self) -> CliResult<LogFormat> {
        self.log_format.parse().map_err(CliError::config_error)
    }
}
