use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "connect_to_db_config.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_FILE`].
pub const CONFIG_PATH_ENV: &str = "BOOKSHOP_CONFIG";
/// Key under `ConnectionStrings` holding the store's URL.
pub const DEFAULT_CONNECTION_NAME: &str = "DefaultConnection";

const SQLITE_SCHEME: &str = "sqlite:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub connection_string: String,
    pub max_connections: u32,
    pub create_if_missing: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Missing connection string: ConnectionStrings.{0}")]
    MissingConnectionString(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ConfigFile {
    #[serde(default)]
    connection_strings: HashMap<String, String>,
    #[serde(default)]
    store: StoreSection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StoreSection {
    #[serde(default = "default_max_connections")]
    max_connections: u32,
    #[serde(default = "default_create_if_missing")]
    create_if_missing: bool,
}

impl Default for StoreSection {
    fn default() -> Self {
        StoreSection {
            max_connections: default_max_connections(),
            create_if_missing: default_create_if_missing(),
        }
    }
}

fn default_max_connections() -> u32 {
    1
}

fn default_create_if_missing() -> bool {
    true
}

impl StoreConfig {
    /// Config for a connection string with default pool settings.
    pub fn new(connection_string: impl Into<String>) -> Self {
        StoreConfig {
            connection_string: connection_string.into(),
            max_connections: default_max_connections(),
            create_if_missing: default_create_if_missing(),
        }
    }

    /// Load from `$BOOKSHOP_CONFIG`, falling back to `connect_to_db_config.json`
    /// in the current directory.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::from_file(path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(json)?;

        let connection_string = file
            .connection_strings
            .get(DEFAULT_CONNECTION_NAME)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ConfigError::MissingConnectionString(DEFAULT_CONNECTION_NAME.to_string())
            })?;

        if !connection_string.starts_with(SQLITE_SCHEME) {
            return Err(ConfigError::InvalidValue(
                DEFAULT_CONNECTION_NAME.to_string(),
                format!("must be a sqlite: URL, got {}", connection_string),
            ));
        }

        if file.store.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "Store.MaxConnections".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(StoreConfig {
            connection_string,
            max_connections: file.store.max_connections,
            create_if_missing: file.store.create_if_missing,
        })
    }
}
