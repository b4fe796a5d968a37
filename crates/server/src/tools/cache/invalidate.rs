//! cache_invalidate tool implementation.
//!
//! Runs the query-cache mutation hook, dropping every auto-invalidated entry.

use qcache_core::{Error, QueryCache, cache::MutationOption};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_invalidate tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateParams {
    /// Tables written by the mutation. Recorded in logs only.
    #[serde(default)]
    pub tables: Vec<String>,

    /// Tags written by the mutation. Recorded in logs only.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Output from the cache_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateOutput {
    /// Number of entries removed.
    pub removed: u64,
}

/// Implementation of the cache_invalidate tool.
pub async fn invalidate_impl(
    cache: &dyn QueryCache, params: CacheInvalidateParams,
) -> Result<CallToolResult, McpError> {
    let mutation = MutationOption { tables: params.tables, tags: params.tags };
    let removed = cache.on_mutate(&mutation).await?;

    let output = CacheInvalidateOutput { removed };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
