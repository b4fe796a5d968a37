//! cache_get tool implementation.
//!
//! Reads a live entry by its exact storage key.

use qcache_core::{CacheValue, Error, TtlStore};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// The storage key to read.
    pub key: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub key: String,
    /// Structured value, if the entry holds JSON.
    pub value: Option<serde_json::Value>,
    /// Hex-encoded bytes, if the entry holds a raw payload.
    pub raw_hex: Option<String>,
    /// Expiry of the row the value was read from.
    pub expires_at: String,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(store: &TtlStore, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let entry = store
        .get_live(&params.key)
        .await?
        .ok_or_else(|| Error::CacheMiss(params.key.clone()))?;

    let expires_at = entry.expires_at;
    let (value, raw_hex) = match entry.value {
        CacheValue::Struct(v) => (Some(v), None),
        CacheValue::Raw(bytes) => (None, Some(hex::encode(bytes))),
    };

    let output = CacheGetOutput { key: params.key, value, raw_hex, expires_at };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
