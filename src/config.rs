use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::constants::{
    normalize_prefix, CATALOG_EXTENSION, DEFAULT_CONFIG_FILE, DEFAULT_DATA_DIR, DEFAULT_HOST,
    DEFAULT_LOG_DIR, DEFAULT_MAX_DEPTH, DEFAULT_PORT, DEFAULT_PREFIX, DEFAULT_WEB_DIR,
    ENV_DATA_DIR, ENV_HOST, ENV_LOG_DIR, ENV_PORT, ENV_PREFIX, ENV_WEB_DIR,
};
use crate::error::{CatalogError, Result};

/// Runtime configuration. Every section and field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// URL prefix the API and static assets are mounted under
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub data_dir: PathBuf,
    pub extension: String,
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            extension: CATALOG_EXTENSION.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_WEB_DIR),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from `config.toml` when it exists,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply `TAG_CATALOG_*` overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port.trim().parse().map_err(|_| {
                CatalogError::Config(format!("{} must be a port number, got '{}'", ENV_PORT, port))
            })?;
        }
        if let Some(prefix) = lookup(ENV_PREFIX) {
            self.server.prefix = prefix;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.catalog.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_WEB_DIR) {
            self.web.dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.logging.dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Check invariants and normalize the URL prefix.
    pub fn validate(&mut self) -> Result<()> {
        let ext = &self.catalog.extension;
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(CatalogError::Config(format!(
                "catalog extension must look like '.yaml', got '{}'",
                ext
            )));
        }
        if self.catalog.max_depth == 0 {
            return Err(CatalogError::Config(
                "catalog max_depth must be at least 1".to_string(),
            ));
        }
        self.server.prefix = normalize_prefix(&self.server.prefix);
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|e| {
            CatalogError::Config(format!("invalid listen address '{}': {}", addr, e))
        })
    }
}
