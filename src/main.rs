//! Mini Cache - demo composition root
//!
//! Builds a cache from environment options, fronts an in-memory "database"
//! with it, and exercises it from concurrent tasks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Context};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_cache::{CacheOptions, Datasource, ReadThrough};

/// Key-value table standing in for a slow backing store.
struct ProfileTable {
    rows: HashMap<String, String>,
}

impl Datasource<String> for ProfileTable {
    fn load(&self, key: &str) -> Option<String> {
        self.rows.get(key).cloned()
    }
}

const PROFILE_KEY: &str = "user:12345:profile";
const WORKERS: usize = 8;
const KEYS_PER_WORKER: usize = 200;

/// Main entry point for the Mini Cache demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load cache options from environment variables
/// 3. Build the cache and put it in front of the profile table
/// 4. Run the read-through walk-through and the concurrent workload
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini Cache demo");

    let options = CacheOptions::from_env().context("invalid cache configuration")?;
    info!(
        "Configuration loaded: capacity={}, policy={}, default_expiration={:?}",
        options.capacity, options.policy, options.default_expiration
    );

    let cache = options.build::<String>()?;
    let table = ProfileTable {
        rows: HashMap::from([(PROFILE_KEY.to_string(), "best user".to_string())]),
    };
    let reader = Arc::new(ReadThrough::new(cache, table, Duration::from_secs(30)));

    read_through_walkthrough(&reader).await?;
    concurrent_workload(&reader).await?;

    let stats = reader.cache().stats();
    info!(
        "Cache stats: {}",
        serde_json::to_string(&stats).context("failed to encode stats")?
    );
    info!("hit rate {:.2}, source loads {}", stats.hit_rate(), reader.source_loads());

    Ok(())
}

/// Caches a profile for one second, waits for it to expire and reads it
/// again through the backing table.
async fn read_through_walkthrough(reader: &ReadThrough<String, ProfileTable>) -> anyhow::Result<()> {
    let cache = reader.cache();
    cache.set_with_expiration(PROFILE_KEY, "best user".to_string(), Duration::from_secs(1));

    let got = reader.get(PROFILE_KEY)?;
    ensure!(got == "best user", "unexpected cached value {got:?}");
    info!("Read {PROFILE_KEY} from cache");

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(2)) => {}
        _ = signal::ctrl_c() => {
            warn!("Received Ctrl+C, skipping wait");
            return Ok(());
        }
    }

    let got_again = reader.get(PROFILE_KEY)?;
    ensure!(got_again == "best user", "unexpected reloaded value {got_again:?}");
    info!(
        "Read {PROFILE_KEY} again after expiry, source loads so far: {}",
        reader.source_loads()
    );
    Ok(())
}

/// Spawns writer tasks that fill the cache past capacity while re-reading
/// their own keys, then checks the capacity bound held.
async fn concurrent_workload(
    reader: &Arc<ReadThrough<String, ProfileTable>>,
) -> anyhow::Result<()> {
    let mut handles = Vec::with_capacity(WORKERS);

    for worker in 0..WORKERS {
        let reader = Arc::clone(reader);
        handles.push(tokio::spawn(async move {
            let cache = reader.cache();
            for i in 0..KEYS_PER_WORKER {
                let key = format!("worker:{worker}:item:{i}");
                cache.set(&key, format!("payload {i}"));
                if i % 4 == 0 {
                    let _ = cache.get(&key);
                }
            }
        }));
    }

    for handle in handles {
        handle.await.context("worker task panicked")?;
    }

    let cache = reader.cache();
    ensure!(
        cache.len() <= cache.capacity(),
        "cache holds {} entries, capacity is {}",
        cache.len(),
        cache.capacity()
    );
    info!(
        "Concurrent workload done: {} entries held, capacity {}",
        cache.len(),
        cache.capacity()
    );
    Ok(())
}
