//! Service configuration
//!
//! One JSON config file selects the storage backend and carries the
//! HTTP server settings. Every field has a default; a missing file
//! yields the default configuration. The store is constructed once at
//! startup from this; there is no module-level connection state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Whole-document JSON file, arbitrary nesting depth.
    File,
    /// Embedded SQLite, one level of nesting.
    Database,
}

/// Storage section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which backend to use (default: "file")
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// JSON document path for the file backend
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Database file path for the database backend
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

fn default_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/records.json")
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/records.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_path: default_data_path(),
            database_path: default_database_path(),
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub http: HttpServerConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// A missing file is not an error; it yields the defaults so the
    /// service can run unconfigured.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}
