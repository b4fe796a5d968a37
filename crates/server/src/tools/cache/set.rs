//! cache_set tool implementation.
//!
//! Stores a JSON value or a hex-encoded raw payload under a direct key.

use std::time::Duration;

use qcache_core::{CacheValue, Error, TtlStore, cache::keys::is_reserved};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_set tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheSetParams {
    /// The key to write. Keys in the `__qcache__:` namespace are rejected.
    pub key: String,

    /// JSON value to store. Mutually exclusive with `raw_hex`.
    pub value: Option<serde_json::Value>,

    /// Hex-encoded bytes to store verbatim. Mutually exclusive with `value`.
    pub raw_hex: Option<String>,

    /// Time to live in seconds; the server default applies when omitted.
    pub ttl_seconds: Option<u64>,
}

/// Output from the cache_set tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheSetOutput {
    pub key: String,
    pub expires_at: Option<String>,
}

/// Implementation of the cache_set tool.
pub async fn set_impl(
    store: &TtlStore, default_ttl: Duration, params: CacheSetParams,
) -> Result<CallToolResult, McpError> {
    if params.key.is_empty() {
        return Err(Error::InvalidInput("key must not be empty".to_string()).into());
    }
    if is_reserved(&params.key) {
        return Err(Error::InvalidInput(format!("key '{}' is in the reserved query-cache namespace", params.key)).into());
    }

    let value = match (params.value, params.raw_hex) {
        (Some(v), None) => CacheValue::Struct(v),
        (None, Some(raw)) => CacheValue::Raw(
            hex::decode(raw.trim()).map_err(|e| Error::InvalidInput(format!("raw_hex is not valid hex: {e}")))?,
        ),
        _ => {
            return Err(Error::InvalidInput("Exactly one of value or raw_hex must be specified".to_string()).into());
        }
    };

    let ttl = params.ttl_seconds.map(Duration::from_secs).unwrap_or(default_ttl);
    store.set(&params.key, &value, ttl).await?;

    let expires_at = store.get_entry(&params.key).await?.map(|entry| entry.expires_at);

    let output = CacheSetOutput { key: params.key, expires_at };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
