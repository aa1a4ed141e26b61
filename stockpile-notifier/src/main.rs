//! # Stockpile Notifier
//!
//! Background worker that fans pantry notifications out to household
//! members:
//! - Consumes pantry item changes from a Redis Stream
//! - Runs the daily expiry and recipe-reminder scans at fixed UTC times
//! - Delivers multicast push batches and appends inbox records
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p stockpile-notifier
//! ```

use std::sync::Arc;
use stockpile_notifier::changefeed::{self, ChangeFeed};
use stockpile_notifier::handlers::NotificationEngine;
use stockpile_notifier::scheduler;
use stockpile_notifier::transport::FcmTransport;
use stockpile_shared::config::Config;
use stockpile_shared::store::postgres::{create_pool, PgStore};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockpile_notifier=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Stockpile Notifier v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    let store = Arc::new(PgStore::new(pool));

    let transport = Arc::new(FcmTransport::new(
        config.push.endpoint.clone(),
        config.push.server_key.clone(),
    ));

    let engine = Arc::new(NotificationEngine::new(store, transport));
    let shutdown = CancellationToken::new();

    // Trigger source: pantry item change feed
    let redis = changefeed::connect(&config.feed.redis_url).await?;
    let feed = ChangeFeed::new(
        redis,
        config.feed.stream_key.clone(),
        config.feed.block_timeout_ms,
        engine.clone(),
        shutdown.clone(),
    );
    let feed_handle = tokio::spawn(feed.run());

    // Scheduler driver: daily scans
    let job_handles = scheduler::spawn_daily_jobs(engine, shutdown.clone());

    tracing::info!("Notifier ready: consuming item changes and awaiting scan schedules");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping...");
    shutdown.cancel();

    feed_handle.await?;
    for handle in job_handles {
        handle.await?;
    }

    tracing::info!("Notifier stopped");
    Ok(())
}
