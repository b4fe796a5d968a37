//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (QCACHE_*)
//! 2. TOML config file (if QCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::adapter::{DEFAULT_TTL_SECONDS, QueryCacheConfig};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (QCACHE_*)
/// 2. TOML config file (if QCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cache database.
    ///
    /// Set via QCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Time to live for entries stored without an explicit expiry.
    ///
    /// Set via QCACHE_DEFAULT_TTL_SECONDS environment variable.
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,

    /// Whether host engines should cache every query.
    ///
    /// Set via QCACHE_GLOBAL environment variable.
    #[serde(default)]
    pub global: bool,

    /// Seconds between background purge sweeps.
    ///
    /// Set via QCACHE_PURGE_INTERVAL_SECS environment variable.
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,

    /// Maximum expired entries removed per sweep.
    ///
    /// Set via QCACHE_PURGE_BATCH_SIZE environment variable.
    #[serde(default = "default_purge_batch_size")]
    pub purge_batch_size: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./qcache.sqlite")
}

fn default_ttl_seconds() -> u64 {
    DEFAULT_TTL_SECONDS
}

fn default_purge_interval_secs() -> u64 {
    60
}

fn default_purge_batch_size() -> usize {
    500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            default_ttl_seconds: default_ttl_seconds(),
            global: false,
            purge_interval_secs: default_purge_interval_secs(),
            purge_batch_size: default_purge_batch_size(),
        }
    }
}

impl AppConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs)
    }

    /// Adapter options derived from this configuration.
    pub fn query_cache(&self) -> QueryCacheConfig {
        QueryCacheConfig { default_ttl_seconds: Some(self.default_ttl_seconds), global: Some(self.global) }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("QCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("QCACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into()),
        );

        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./qcache.sqlite"));
        assert_eq!(config.default_ttl_seconds, 60);
        assert!(!config.global);
        assert_eq!(config.purge_interval_secs, 60);
        assert_eq!(config.purge_batch_size, 500);
    }

    #[test]
    fn test_durations() {
        let config = AppConfig { default_ttl_seconds: 5, purge_interval_secs: 7, ..Default::default() };
        assert_eq!(config.default_ttl(), Duration::from_secs(5));
        assert_eq!(config.purge_interval(), Duration::from_secs(7));
    }

    #[test]
    fn test_query_cache_config() {
        let config = AppConfig { global: true, default_ttl_seconds: 120, ..Default::default() };
        let qc = config.query_cache();
        assert_eq!(qc.global, Some(true));
        assert_eq!(qc.default_ttl_seconds, Some(120));
    }

    #[test]
    fn test_toml_layer_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string("global = true\npurge_batch_size = 50\n"));

        let config = AppConfig::extract(figment).unwrap();
        assert!(config.global);
        assert_eq!(config.purge_batch_size, 50);
        assert_eq!(config.default_ttl_seconds, 60);
    }

    #[test]
    fn test_invalid_layer_rejected() {
        let figment =
            Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string("purge_batch_size = 0\n"));

        assert!(matches!(AppConfig::extract(figment), Err(ConfigError::Invalid { .. })));
    }
}
