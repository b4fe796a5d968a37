//! Cache-related MCP tools.
//!
//! This module provides tools for direct access to the TTL store.

pub mod delete;
pub mod get;
pub mod invalidate;
pub mod purge;
pub mod set;

pub use delete::{CacheDeleteParams, delete_impl};
pub use get::{CacheGetParams, get_impl};
pub use invalidate::{CacheInvalidateParams, invalidate_impl};
pub use purge::{CachePurgeParams, purge_impl};
pub use set::{CacheSetParams, set_impl};
