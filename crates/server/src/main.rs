//! qcache server entry point.
//!
//! Boots the MCP server on stdio transport and the background purge task.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use qcache_core::{AppConfig, TtlStore};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod sweeper;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    tracing::info!(db_path = %config.db_path.display(), global = config.global, "Starting qcache server on stdio transport");

    let store = TtlStore::open(&config.db_path).await?;
    let purge_task = sweeper::spawn_purge_task(store.clone(), config.purge_interval(), config.purge_batch_size);

    let handler = handler::McpCacheServer::new(&config, store);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;
    purge_task.abort();

    Ok(())
}
