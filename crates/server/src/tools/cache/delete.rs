//! cache_delete tool implementation.

use qcache_core::{Error, TtlStore};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDeleteParams {
    /// The key to delete. Missing keys are not an error.
    pub key: String,
}

/// Output from the cache_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDeleteOutput {
    pub key: String,
}

/// Implementation of the cache_delete tool.
pub async fn delete_impl(store: &TtlStore, params: CacheDeleteParams) -> Result<CallToolResult, McpError> {
    store.del(&params.key).await?;

    let output = CacheDeleteOutput { key: params.key };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
