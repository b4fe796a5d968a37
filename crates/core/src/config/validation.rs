//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

const MAX_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;
const MAX_PURGE_INTERVAL_SECS: u64 = 24 * 60 * 60;
const MAX_PURGE_BATCH_SIZE: usize = 100_000;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `default_ttl_seconds` is 0 or exceeds 30 days
    /// - `purge_interval_secs` is 0 or exceeds one day
    /// - `purge_batch_size` is 0 or exceeds 100000
    ///
    /// Returns `ConfigError::Missing` if `db_path` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: "db_path".into(),
                hint: "Set QCACHE_DB_PATH environment variable".into(),
            });
        }

        if self.default_ttl_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "default_ttl_seconds".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.default_ttl_seconds > MAX_TTL_SECONDS {
            return Err(ConfigError::Invalid {
                field: "default_ttl_seconds".into(),
                reason: "must not exceed 30 days".into(),
            });
        }

        if self.purge_interval_secs == 0 || self.purge_interval_secs > MAX_PURGE_INTERVAL_SECS {
            return Err(ConfigError::Invalid {
                field: "purge_interval_secs".into(),
                reason: format!("must be between 1 and {MAX_PURGE_INTERVAL_SECS}"),
            });
        }

        if self.purge_batch_size == 0 || self.purge_batch_size > MAX_PURGE_BATCH_SIZE {
            return Err(ConfigError::Invalid {
                field: "purge_batch_size".into(),
                reason: format!("must be between 1 and {MAX_PURGE_BATCH_SIZE}"),
            });
        }

        if self.purge_interval_secs > self.default_ttl_seconds.saturating_mul(10) {
            tracing::warn!(
                purge_interval_secs = self.purge_interval_secs,
                default_ttl_seconds = self.default_ttl_seconds,
                "Purge interval is much longer than the default TTL; \
                 unread expired entries will linger"
            );
        }

        Ok(())
    }
}
