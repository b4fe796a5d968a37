//! TTL store operations.
//!
//! Expiry is enforced on read: `get` never returns an entry whose `expires_at`
//! has passed, and deletes it on the way out. `purge_expired` only reclaims
//! space for keys nobody reads again.

use super::codec::{self, CacheValue};
use super::connection::TtlStore;
use crate::Error;
use chrono::{DateTime, Datelike, SecondsFormat, TimeDelta, Utc};
use std::time::Duration;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A raw cache row.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    /// Tagged bytes as produced by the codec.
    pub value: Vec<u8>,
    pub expires_at: String,
    pub updated_at: String,
}

impl CacheEntry {
    /// Whether the entry is dead at `now`. Unparseable expiries count as dead.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(expires_at) => expires_at.with_timezone(&Utc) <= now,
            Err(_) => true,
        }
    }
}

/// A decoded live value together with its expiry, read in one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveEntry {
    pub value: CacheValue,
    pub expires_at: String,
}

enum Lookup {
    Missing,
    Expired,
    Live { value: Vec<u8>, expires_at: String },
}

/// Latest expiry the fixed-width timestamp format can represent.
const MAX_EXPIRY_YEAR: i32 = 9999;

/// Fixed-width UTC timestamp; sorts lexicographically in time order.
pub(crate) fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn select_entry(conn: &rusqlite::Connection, key: &str) -> Result<Option<CacheEntry>, Error> {
    let mut stmt = conn.prepare("SELECT key, value, expires_at, updated_at FROM query_cache WHERE key = ?1")?;

    let result = stmt.query_row(params![key], |row| {
        Ok(CacheEntry { key: row.get(0)?, value: row.get(1)?, expires_at: row.get(2)?, updated_at: row.get(3)? })
    });

    match result {
        Ok(entry) => Ok(Some(entry)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl TtlStore {
    /// Get a live value by key.
    ///
    /// Returns None if the key is absent, expired, or its payload cannot be
    /// decoded. An expired row is deleted before returning.
    pub async fn get(&self, key: &str) -> Result<Option<CacheValue>, Error> {
        Ok(self.get_live(key).await?.map(|entry| entry.value))
    }

    /// Like [`TtlStore::get`], but also returns the expiry of the row the
    /// value was read from.
    pub async fn get_live(&self, key: &str) -> Result<Option<LiveEntry>, Error> {
        let owned_key = key.to_string();
        let now = Utc::now();

        let lookup = self
            .conn
            .call(move |conn| -> Result<Lookup, Error> {
                let Some(entry) = select_entry(conn, &owned_key)? else {
                    return Ok(Lookup::Missing);
                };

                if entry.is_expired_at(now) {
                    // Only delete the row we saw; a concurrent set may have refreshed it.
                    conn.execute(
                        "DELETE FROM query_cache WHERE key = ?1 AND expires_at = ?2",
                        params![entry.key, entry.expires_at],
                    )?;
                    return Ok(Lookup::Expired);
                }

                Ok(Lookup::Live { value: entry.value, expires_at: entry.expires_at })
            })
            .await
            .map_err(Error::from)?;

        match lookup {
            Lookup::Missing => {
                tracing::debug!(key, "Cache miss");
                Ok(None)
            }
            Lookup::Expired => {
                tracing::debug!(key, "Evicted expired cache entry");
                Ok(None)
            }
            Lookup::Live { value, expires_at } => {
                let value = codec::decode(&value);
                tracing::debug!(key, hit = value.is_some(), "Cache read");
                Ok(value.map(|value| LiveEntry { value, expires_at }))
            }
        }
    }

    /// Get the raw row for a key, without expiry handling or decoding.
    pub async fn get_entry(&self, key: &str) -> Result<Option<CacheEntry>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| select_entry(conn, &key))
            .await
            .map_err(Error::from)
    }

    /// Insert or replace a value with the given time to live.
    ///
    /// Uses a single UPSERT statement: value, expiry and update time are
    /// replaced together or not at all. A ttl reaching past the year 9999 is
    /// rejected with `Error::InvalidInput`.
    pub async fn set(&self, key: &str, value: &CacheValue, ttl: Duration) -> Result<(), Error> {
        let encoded = codec::encode(value)?;

        let now = Utc::now();
        let expires_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .filter(|t| t.year() <= MAX_EXPIRY_YEAR)
            .ok_or_else(|| Error::InvalidInput(format!("ttl out of range: {ttl:?}")))?;

        let key = key.to_string();
        let expires_at = timestamp(expires_at);
        let updated_at = timestamp(now);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO query_cache (key, value, expires_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        expires_at = excluded.expires_at,
                        updated_at = excluded.updated_at",
                    params![key, encoded, expires_at, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a key. Deleting a missing key is not an error.
    pub async fn del(&self, key: &str) -> Result<(), Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute("DELETE FROM query_cache WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete up to `limit` expired entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired(&self, limit: usize) -> Result<u64, Error> {
        let now = timestamp(Utc::now());
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM query_cache WHERE key IN (
                        SELECT key FROM query_cache WHERE expires_at < ?1 LIMIT ?2
                    )",
                    params![now, limit],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry whose key starts with `prefix`.
    ///
    /// The comparison is exact and case-sensitive. Returns the number of
    /// deleted entries.
    pub async fn delete_prefix(&self, prefix: &str) -> Result<u64, Error> {
        let prefix = prefix.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM query_cache WHERE substr(key, 1, length(?1)) = ?1",
                    params![prefix],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of stored rows, live or not.
    pub async fn count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM query_cache", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
