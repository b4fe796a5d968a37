//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::time::Duration;

use crate::tools::cache::{
    CacheDeleteParams, CacheGetParams, CacheInvalidateParams, CachePurgeParams, CacheSetParams, delete_impl,
    get_impl, invalidate_impl, purge_impl, set_impl,
};

use qcache_core::{AppConfig, StoreQueryCache, TtlStore};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for qcache.
#[derive(Clone)]
pub struct McpCacheServer {
    store: TtlStore,
    query_cache: StoreQueryCache,
    default_ttl: Duration,
    purge_batch_size: usize,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl McpCacheServer {
    /// Create a new server handler over an opened store.
    pub fn new(config: &AppConfig, store: TtlStore) -> Self {
        let query_cache = StoreQueryCache::new(store.clone(), config.query_cache());
        Self {
            store,
            query_cache,
            default_ttl: config.default_ttl(),
            purge_batch_size: config.purge_batch_size,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Read a live cache entry by key. Returns the JSON value or hex-encoded bytes.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.store, params.0).await
    }

    #[tool(description = "Store a JSON value or hex-encoded bytes under a key with a time to live.")]
    async fn cache_set(&self, params: Parameters<CacheSetParams>) -> Result<CallToolResult, McpError> {
        set_impl(&self.store, self.default_ttl, params.0).await
    }

    #[tool(description = "Delete a cache entry by key. Deleting a missing key succeeds.")]
    async fn cache_delete(&self, params: Parameters<CacheDeleteParams>) -> Result<CallToolResult, McpError> {
        delete_impl(&self.store, params.0).await
    }

    #[tool(description = "Delete one bounded batch of expired cache entries. Returns the number deleted.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.store, self.purge_batch_size, params.0).await
    }

    #[tool(description = "Drop every auto-invalidated query cache entry, as after a database write.")]
    async fn cache_invalidate(&self, params: Parameters<CacheInvalidateParams>) -> Result<CallToolResult, McpError> {
        invalidate_impl(&self.query_cache, params.0).await
    }
}

impl ServerHandler for McpCacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "qcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lists_cache_tools() {
        let store = TtlStore::open_in_memory().await.unwrap();
        let server = McpCacheServer::new(&AppConfig::default(), store);

        let names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        for expected in ["cache_get", "cache_set", "cache_delete", "cache_purge", "cache_invalidate"] {
            assert!(names.iter().any(|n| n == expected), "missing tool {expected}");
        }
    }

    #[tokio::test]
    async fn test_server_info() {
        let store = TtlStore::open_in_memory().await.unwrap();
        let server = McpCacheServer::new(&AppConfig::default(), store);
        assert_eq!(server.get_info().server_info.name, "qcache");
    }
}
