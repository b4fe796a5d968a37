//! Core types and shared functionality for qcache.
//!
//! This crate provides:
//! - Persistent TTL result cache with SQLite backend
//! - Query-cache adapter for host query engines
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheEntry, CacheStrategy, CacheValue, PutConfig, QueryCache, StoreQueryCache, TtlStore};
pub use config::AppConfig;
pub use error::Error;
