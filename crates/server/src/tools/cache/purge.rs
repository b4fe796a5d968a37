//! cache_purge tool implementation.
//!
//! Removes one bounded batch of expired entries.

use qcache_core::{Error, TtlStore};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Maximum number of expired entries to delete; the server batch size applies when omitted.
    pub limit: Option<usize>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(
    store: &TtlStore, default_limit: usize, params: CachePurgeParams,
) -> Result<CallToolResult, McpError> {
    let limit = params.limit.unwrap_or(default_limit);
    if limit == 0 {
        return Err(Error::InvalidInput("limit must be greater than 0".to_string()).into());
    }

    let deleted = store.purge_expired(limit).await?;

    let output = CachePurgeOutput { deleted };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
