//! Background purge of expired entries.
//!
//! Reads already hide expired entries; the sweeper only reclaims rows for
//! keys that are never read again. Each tick removes at most one batch.

use std::time::Duration;

use qcache_core::{Error, TtlStore};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Run a single bounded purge and log the outcome.
pub async fn sweep_once(store: &TtlStore, batch_size: usize) -> Result<u64, Error> {
    let removed = store.purge_expired(batch_size).await?;
    if removed > 0 {
        info!(removed, batch_size, "Purged expired cache entries");
    } else {
        debug!("Purge sweep found no expired entries");
    }
    Ok(removed)
}

/// Spawn the periodic purge task.
///
/// Store errors are logged and the loop keeps running. Abort the returned
/// handle on shutdown.
pub fn spawn_purge_task(store: TtlStore, interval: Duration, batch_size: usize) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, batch_size, "Starting cache purge task");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = sweep_once(&store, batch_size).await {
                warn!(error = %e, "Cache purge sweep failed");
            }
        }
    })
}
