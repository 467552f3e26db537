//! Configuration loading and management
//!
//! Settings come from an optional YAML file (path in `SMART_SHOP_CONFIG`)
//! and are then overridden by individual environment variables:
//!
//! | Variable          | Setting                      |
//! |-------------------|------------------------------|
//! | `HOST`            | `server.host`                |
//! | `PORT`            | `server.port`                |
//! | `STORAGE_BACKEND` | `storage.backend`            |
//! | `MONGO_URI`       | `storage.mongo_uri`          |
//! | `MONGO_DATABASE`  | `storage.database`           |
//! | `UPLOAD_PATH`     | `storage.upload_path`        |
//! | `LOG_FILTER`      | `log_filter`                 |

use crate::core::retry::RetryConfig;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Environment variable holding the YAML config path
pub const CONFIG_PATH_ENV: &str = "SMART_SHOP_CONFIG";

/// Which persistence layer backs the services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    InMemory,
    Mongodb,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in_memory" | "in-memory" | "memory" => Ok(StorageBackend::InMemory),
            "mongodb" | "mongo" => Ok(StorageBackend::Mongodb),
            other => Err(anyhow!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub mongo_uri: String,
    pub database: String,
    /// Root directory for uploaded product images
    pub upload_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::InMemory,
            mongo_uri: "mongodb://localhost:27017".to_string(),
            database: "smart_shop".to_string(),
            upload_path: "uploads".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Backoff applied when emptying the cart after an order is stored
    pub retry: RetryConfig,
}

/// Complete shop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub checkout: CheckoutConfig,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            checkout: CheckoutConfig::default(),
            log_filter: "info,tower_http=debug".to_string(),
        }
    }
}

impl ShopConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// File named by `SMART_SHOP_CONFIG` (or defaults), then env overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup, usually the process environment
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        }
        if let Some(backend) = lookup("STORAGE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(uri) = lookup("MONGO_URI") {
            self.storage.mongo_uri = uri;
        }
        if let Some(database) = lookup("MONGO_DATABASE") {
            self.storage.database = database;
        }
        if let Some(path) = lookup("UPLOAD_PATH") {
            self.storage.upload_path = path;
        }
        if let Some(filter) = lookup("LOG_FILTER") {
            self.log_filter = filter;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
