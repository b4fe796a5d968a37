//! SQLite-backed TTL result cache.
//!
//! This module provides a persistent key-value cache with per-entry expiry,
//! using SQLite with async access via tokio-rusqlite. It supports:
//!
//! - Self-describing value encoding (raw bytes or JSON)
//! - Namespaced keys separating auto-invalidated and manual entries
//! - Lazy expiry on read plus bounded background purge
//! - A pluggable adapter for host query engines

pub mod adapter;
pub mod codec;
pub mod connection;
pub mod hash;
pub mod keys;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use adapter::{CacheStrategy, MutationOption, PutConfig, QueryCache, QueryCacheConfig, StoreQueryCache};
pub use codec::CacheValue;
pub use connection::TtlStore;
pub use hash::query_key;
pub use store::{CacheEntry, LiveEntry};
