//! Query-cache adapter for host query engines.
//!
//! A host engine decides which queries to cache based on [`QueryCache::strategy`],
//! then calls `get`/`put` with a logical key and the tables the query touched,
//! and `on_mutate` after every write it performs.
//!
//! Invalidation is coarse: any mutation drops every auto-invalidated entry,
//! whatever tables it touched. Entries written with no tables are manual and
//! survive mutations until they expire or are deleted.

use super::codec::CacheValue;
use super::connection::TtlStore;
use super::keys::{AUTO_PREFIX, build_key};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default time to live for adapter entries.
pub const DEFAULT_TTL_SECONDS: u64 = 60;

/// Which queries the host engine should route through the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStrategy {
    /// Only queries the host marked as cacheable.
    Explicit,
    /// Every query.
    All,
}

/// Adapter construction options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryCacheConfig {
    pub default_ttl_seconds: Option<u64>,
    /// Cache every query (`CacheStrategy::All`) instead of explicit ones.
    pub global: Option<bool>,
}

/// Per-put expiry options.
///
/// `ttl_millis` wins over `ttl_seconds`; a zero `ttl_millis` counts as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutConfig {
    pub ttl_millis: Option<u64>,
    pub ttl_seconds: Option<u64>,
}

/// Description of a write performed by the host engine.
///
/// Carried for the host's benefit; invalidation does not inspect it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutationOption {
    pub tables: Vec<String>,
    pub tags: Vec<String>,
}

/// Capability contract a host query engine expects from a result cache.
#[async_trait::async_trait]
pub trait QueryCache: Send + Sync {
    /// Read-only metadata telling the host which queries to cache.
    fn strategy(&self) -> CacheStrategy;

    /// Look up a cached result. `auto_invalidate` defaults to true.
    async fn get(
        &self, key: &str, tables: &[String], is_tag: bool, auto_invalidate: Option<bool>,
    ) -> Result<Option<CacheValue>, Error>;

    /// Store a result. Entries with a non-empty `tables` are auto-invalidated.
    async fn put(
        &self, key: &str, value: CacheValue, tables: &[String], is_tag: bool, config: Option<PutConfig>,
    ) -> Result<(), Error>;

    /// Drop every auto-invalidated entry. Returns the number removed.
    async fn on_mutate(&self, mutation: &MutationOption) -> Result<u64, Error>;
}

/// [`QueryCache`] backed by a [`TtlStore`].
#[derive(Clone, Debug)]
pub struct StoreQueryCache {
    store: TtlStore,
    default_ttl: Duration,
    strategy: CacheStrategy,
}

impl StoreQueryCache {
    pub fn new(store: TtlStore, config: QueryCacheConfig) -> Self {
        let default_ttl = Duration::from_secs(config.default_ttl_seconds.unwrap_or(DEFAULT_TTL_SECONDS));
        let strategy = if config.global.unwrap_or(false) { CacheStrategy::All } else { CacheStrategy::Explicit };
        Self { store, default_ttl, strategy }
    }

    pub fn store(&self) -> &TtlStore {
        &self.store
    }

    /// Resolve the time to live for a put.
    pub fn resolve_ttl(&self, config: Option<PutConfig>) -> Duration {
        let config = config.unwrap_or_default();
        match (config.ttl_millis.filter(|ms| *ms > 0), config.ttl_seconds) {
            (Some(ms), _) => Duration::from_millis(ms),
            (None, Some(secs)) => Duration::from_secs(secs),
            (None, None) => self.default_ttl,
        }
    }
}

#[async_trait::async_trait]
impl QueryCache for StoreQueryCache {
    fn strategy(&self) -> CacheStrategy {
        self.strategy
    }

    async fn get(
        &self, key: &str, _tables: &[String], is_tag: bool, auto_invalidate: Option<bool>,
    ) -> Result<Option<CacheValue>, Error> {
        let cache_key = build_key(key, is_tag, auto_invalidate.unwrap_or(true));
        self.store.get(&cache_key).await
    }

    async fn put(
        &self, key: &str, value: CacheValue, tables: &[String], is_tag: bool, config: Option<PutConfig>,
    ) -> Result<(), Error> {
        let ttl = self.resolve_ttl(config);
        let auto_invalidate = !tables.is_empty();
        let cache_key = build_key(key, is_tag, auto_invalidate);

        tracing::debug!(key = %cache_key, ttl_ms = ttl.as_millis() as u64, tables = tables.len(), "Caching query result");
        self.store.set(&cache_key, &value, ttl).await
    }

    async fn on_mutate(&self, mutation: &MutationOption) -> Result<u64, Error> {
        let removed = self.store.delete_prefix(AUTO_PREFIX).await?;
        tracing::info!(
            removed,
            tables = ?mutation.tables,
            tags = ?mutation.tags,
            "Invalidated auto-tracked query cache entries"
        );
        Ok(removed)
    }
}
