//! Application configuration.
//!
//! Read from a TOML file; every key is optional.
//!
//! ```toml
//! log_level = "debug"
//! log_file = "tax-case.log"
//!
//! [database]
//! backend = "memory"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tax_core::db::DbConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins when set.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub database: DbConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            database: DbConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(
        input: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input, path)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
