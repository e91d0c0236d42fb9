use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::constants::{env, limits};

/// Startup configuration problems. Always fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub catalog: CatalogConfig,

    pub log_store: LogStoreConfig,

    /// Config file the settings were read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,

    /// `.env` file applied before the environment overlay, if any.
    #[serde(skip)]
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default tracing filter; `RUST_LOG` takes precedence when set.
    pub log_level: String,

    /// "text" or "json"
    pub log_format: String,

    /// Rows fetched per catalog page
    pub page_size: u64,

    /// Rows shown by the popular/recent statistics views
    pub stats_limit: usize,

    pub min_keyword_len: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: "text".to_string(),
            page_size: limits::PAGE_SIZE,
            stats_limit: limits::DEFAULT_STATS_LIMIT,
            min_keyword_len: limits::MIN_KEYWORD_LEN,
        }
    }
}

/// Relational catalog connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub host: String,

    pub port: u16,

    pub user: String,

    #[serde(skip_serializing)]
    pub password: String,

    pub database: String,

    pub connect_timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 3306,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            connect_timeout_seconds: 10,
        }
    }
}

impl CatalogConfig {
    /// Connection URL with percent-encoded credentials.
    pub fn url(&self) -> Result<String, ConfigError> {
        let invalid_host = || ConfigError::Invalid {
            key: env::MYSQL_HOST,
            value: self.host.clone(),
        };

        let mut url = Url::parse(&format!("mysql://{}", self.host)).map_err(|_| invalid_host())?;
        if url.host_str().is_none() {
            return Err(invalid_host());
        }
        url.set_port(Some(self.port)).map_err(|()| invalid_host())?;
        url.set_username(&self.user)
            .map_err(|()| ConfigError::Invalid {
                key: env::MYSQL_USER,
                value: self.user.clone(),
            })?;
        url.set_password(Some(&self.password))
            .map_err(|()| ConfigError::Invalid {
                key: env::MYSQL_PASSWORD,
                value: "<redacted>".to_string(),
            })?;
        url.set_path(&self.database);

        Ok(url.to_string())
    }
}

/// Document store settings for the search log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogStoreConfig {
    #[serde(skip_serializing)]
    pub uri: String,

    pub database: String,

    pub collection: String,
}

impl Config {
    /// Reads `.env`, the first config file found, then environment overrides.
    ///
    /// Runs before tracing is set up, so it records where settings came from
    /// instead of logging; see [`Config::log_sources`].
    pub fn load() -> Result<Self> {
        let env_file = dotenvy::dotenv().ok();

        let mut config = Self::load_file()?;
        config.env_file = env_file;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        match Self::config_paths().into_iter().find(|path| path.exists()) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Reports the config file and `.env` used by [`Config::load`].
    pub fn log_sources(&self) {
        match &self.source {
            Some(path) => info!("Loaded config from: {}", path.display()),
            None => debug!("No config file found, using defaults"),
        }
        if let Some(path) = &self.env_file {
            debug!("Loaded environment from: {}", path.display());
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.source = Some(path.to_path_buf());

        Ok(config)
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("movie-search").join("config.toml"));
        }

        paths
    }

    /// Overlays connection settings from the given variable lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |target: &mut String, key: &str| {
            if let Some(value) = lookup(key) {
                *target = value;
            }
        };

        set(&mut self.catalog.host, env::MYSQL_HOST);
        set(&mut self.catalog.user, env::MYSQL_USER);
        set(&mut self.catalog.password, env::MYSQL_PASSWORD);
        set(&mut self.catalog.database, env::MYSQL_DATABASE);
        set(&mut self.log_store.uri, env::MONGO_URI);
        set(&mut self.log_store.database, env::MONGO_DATABASE);
        set(&mut self.log_store.collection, env::MONGO_COLLECTION);

        if let Some(port) = lookup(env::MYSQL_PORT) {
            self.catalog.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: env::MYSQL_PORT,
                value: port.clone(),
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            (env::MYSQL_HOST, &self.catalog.host),
            (env::MYSQL_USER, &self.catalog.user),
            (env::MYSQL_PASSWORD, &self.catalog.password),
            (env::MYSQL_DATABASE, &self.catalog.database),
            (env::MONGO_URI, &self.log_store.uri),
            (env::MONGO_DATABASE, &self.log_store.database),
            (env::MONGO_COLLECTION, &self.log_store.collection),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(key));
            }
        }

        if self.general.page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "general.page_size",
                value: "0".to_string(),
            });
        }

        if self.general.stats_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "general.stats_limit",
                value: "0".to_string(),
            });
        }

        Ok(())
    }
}
