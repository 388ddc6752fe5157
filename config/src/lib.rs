//! # Configuration Management for Medistore
//!
//! This crate provides centralized configuration structures for the Medistore
//! data-access layer: the MySQL connection settings and the query cache
//! settings.
//!
//! ## Resolution order
//!
//! `AppConfig::load()` resolves every setting with the precedence
//!
//! 1. process environment (`DB_URL`, `DB_USER`, `DB_PASSWORD`; a `.env` file
//!    is folded into the environment first and never overrides real
//!    variables),
//! 2. TOML settings file (path from `MEDISTORE_CONFIG`, else
//!    `./medistore.toml` when present),
//! 3. hard-coded local-development defaults.
//!
//! ## TOML File Configuration
//! ```toml
//! [database]
//! url = "mysql://localhost:3306/hospital"
//! user = "root"
//! password = "password"
//! min_connections = 1
//! max_connections = 5
//! acquire_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//!
//! [cache]
//! max_entries = 256
//! key_prefix = "medistore"
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration");
//! // Or load from a fixed path, skipping the environment overlay:
//! let config = AppConfig::from_file("config/production.toml");
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./medistore.toml";
const ENV_CONFIG_PATH: &str = "MEDISTORE_CONFIG";
const ENV_DB_URL: &str = "DB_URL";
const ENV_DB_USER: &str = "DB_USER";
const ENV_DB_PASSWORD: &str = "DB_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// Query cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached entries before the oldest is evicted
    pub max_entries: usize,
    /// Key prefix for all cache entries
    pub key_prefix: String,
}

impl AppConfig {
    /// Load configuration with the environment > file > default precedence.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is not an error; existing environment
        // variables are never overridden by it.
        let _ = dotenvy::dotenv();

        let mut config = if let Ok(config_path) = env::var(ENV_CONFIG_PATH) {
            Self::from_file(config_path)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay the connection settings exposed as environment variables
    fn apply_env(&mut self) {
        if let Ok(url) = env::var(ENV_DB_URL) {
            self.database.url = url;
        }
        if let Ok(user) = env::var(ENV_DB_USER) {
            self.database.user = user;
        }
        if let Ok(password) = env::var(ENV_DB_PASSWORD) {
            self.database.password = password;
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_empty() {
            return Err(ConfigError::Invalid(
                "Database url cannot be empty".to_string(),
            ));
        }
        if self.database.user.is_empty() {
            return Err(ConfigError::Invalid(
                "Database user cannot be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }
        if self.database.acquire_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database acquire_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "Cache max_entries must be greater than 0".to_string(),
            ));
        }
        if self.cache.key_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "Cache key_prefix cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        url: String,
        user: String,
        password: String,
        min_connections: u32,
        max_connections: u32,
        acquire_timeout_seconds: u64,
        idle_timeout_seconds: u64,
        max_lifetime_seconds: u64,
    ) -> Self {
        Self {
            url,
            user,
            password,
            min_connections,
            max_connections,
            acquire_timeout_seconds,
            idle_timeout_seconds,
            max_lifetime_seconds,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        // Local-development fallback when neither the environment nor a
        // settings file provides the connection.
        Self {
            url: "mysql://localhost:3306/hospital".to_string(),
            user: "root".to_string(),
            password: String::new(),
            min_connections: 1,
            max_connections: 5,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: 600,
            max_lifetime_seconds: 3600,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new(max_entries: usize, key_prefix: String) -> Self {
        Self {
            max_entries,
            key_prefix,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            key_prefix: "medistore".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.url, "mysql://localhost:3306/hospital");
        assert_eq!(config.cache.max_entries, 256);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [database]
            url = "mysql://db.internal:3306/clinic"
            password = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url, "mysql://db.internal:3306/clinic");
        assert_eq!(config.database.password, "secret");
        // Unspecified settings keep their defaults
        assert_eq!(config.database.user, "root");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.cache.key_prefix, "medistore");
    }

    #[test]
    fn zero_max_connections_is_rejected() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn min_above_max_is_rejected() {
        let mut config = AppConfig::default();
        config.database.min_connections = 10;
        config.database.max_connections = 2;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn empty_cache_prefix_is_rejected() {
        let mut config = AppConfig::default();
        config.cache.key_prefix.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
