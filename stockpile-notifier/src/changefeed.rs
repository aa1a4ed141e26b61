//! Pantry item change feed
//!
//! The trigger source is a Redis Stream carrying before/after snapshots of
//! pantry item records, one entry per write performed by the management
//! flows. This module consumes the stream with blocking `XREAD` and invokes
//! the matching event handler for each entry.
//!
//! # Entry format
//!
//! One `payload` field holding JSON:
//!
//! ```json
//! { "before": null, "after": { "id": "...", "household_id": "...", ... } }
//! ```
//!
//! The trigger kind is derived from snapshot presence, mirroring the
//! upstream write semantics: no before → created, no after → deleted,
//! both → updated.
//!
//! # Boundary validation
//!
//! Snapshots arrive with every field optional and are validated into typed
//! [`FoodItem`] records here. A snapshot without a household target (or
//! otherwise missing required identity fields) is an orphaned or malformed
//! record: it is dropped silently, not an error — these triggers run
//! unattended and have no caller to report to.
//!
//! Each qualifying entry is handled in its own spawned task; concurrent
//! invocations share no mutable state and one failure never cancels a
//! sibling.

use crate::handlers::NotificationEngine;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::streams::{StreamReadOptions, StreamReadReply};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use stockpile_shared::models::FoodItem;

/// Change feed errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// Redis command error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Malformed entry payload
    #[error("Entry payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Raw item snapshot as carried on the stream
///
/// Every field is optional; validation into a typed record happens at this
/// boundary, with explicit defaults instead of implicit coercion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: Option<Uuid>,
    pub household_id: Option<Uuid>,
    pub name: Option<String>,
    pub added_by: Option<Uuid>,
    pub quantity: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ItemSnapshot {
    /// Validates the snapshot into a typed item
    ///
    /// Requires the household target and the identity fields; `name`
    /// defaults to "an item" and `quantity` to 0. Returns None for
    /// malformed/orphaned snapshots, which callers drop silently.
    pub fn validate(self) -> Option<FoodItem> {
        Some(FoodItem {
            id: self.id?,
            household_id: self.household_id?,
            name: self.name.unwrap_or_else(|| "an item".to_string()),
            added_by: self.added_by?,
            quantity: self.quantity.unwrap_or(0),
            expires_at: self.expires_at?,
        })
    }
}

/// One stream entry: before/after snapshots of an item write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemChangeEvent {
    pub before: Option<ItemSnapshot>,
    pub after: Option<ItemSnapshot>,
}

/// Connects to Redis for feed consumption
///
/// # Errors
///
/// Returns an error if the URL is invalid or the connection fails.
pub async fn connect(redis_url: &str) -> Result<ConnectionManager, FeedError> {
    let client = redis::Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;
    tracing::info!("Change feed connected to Redis");
    Ok(manager)
}

/// Redis Stream consumer driving the item event handlers
pub struct ChangeFeed {
    redis: ConnectionManager,
    stream_key: String,
    block_ms: usize,
    engine: Arc<NotificationEngine>,
    shutdown: CancellationToken,
}

impl ChangeFeed {
    /// Creates a new feed consumer
    pub fn new(
        redis: ConnectionManager,
        stream_key: String,
        block_ms: usize,
        engine: Arc<NotificationEngine>,
        shutdown: CancellationToken,
    ) -> Self {
        ChangeFeed {
            redis,
            stream_key,
            block_ms,
            engine,
            shutdown,
        }
    }

    /// Runs the consume loop until shutdown
    ///
    /// Starts at the stream tail: only changes made while the worker is
    /// running produce notifications. Read errors back off and retry; they
    /// never terminate the loop.
    pub async fn run(mut self) {
        tracing::info!(stream = %self.stream_key, "Change feed starting at tail");
        let mut last_id = "$".to_string();

        loop {
            let reply = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Change feed shutting down");
                    break;
                }
                reply = self.read_batch(&last_id) => reply,
            };

            let reply = match reply {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!(error = %e, "Change feed read failed, backing off");
                    sleep(Duration::from_secs(1)).await;
                    continue;
                }
            };

            for key in reply.keys {
                for entry in key.ids {
                    last_id = entry.id.clone();

                    let payload = match entry.map.get("payload") {
                        Some(redis::Value::Data(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
                        _ => {
                            tracing::debug!(entry_id = %entry.id, "Entry without payload field, skipping");
                            continue;
                        }
                    };

                    let event: ItemChangeEvent = match serde_json::from_str(&payload) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(entry_id = %entry.id, error = %e, "Unparseable change entry, skipping");
                            continue;
                        }
                    };

                    // Each invocation is an independent unit of work
                    let engine = self.engine.clone();
                    tokio::spawn(async move {
                        handle_event(&engine, event).await;
                    });
                }
            }
        }
    }

    async fn read_batch(&self, last_id: &str) -> Result<StreamReadReply, FeedError> {
        let options = StreamReadOptions::default()
            .count(100)
            .block(self.block_ms);
        let mut conn = self.redis.clone();
        let reply: StreamReadReply = conn
            .xread_options(&[self.stream_key.as_str()], &[last_id], &options)
            .await?;
        Ok(reply)
    }
}

/// Dispatches one validated change event to the matching handler
///
/// Handler failures abort only this invocation; the external trigger
/// system owns any redelivery policy, so nothing is retried here.
pub async fn handle_event(engine: &NotificationEngine, event: ItemChangeEvent) {
    let result = match (
        event.before.and_then(ItemSnapshot::validate),
        event.after.and_then(ItemSnapshot::validate),
    ) {
        (None, Some(after)) => engine.item_created(&after).await,
        (Some(before), None) => engine.item_deleted(&before).await,
        (Some(before), Some(after)) => engine.item_updated(&before, &after).await,
        (None, None) => {
            // Orphaned or malformed on both sides: terminal no-op
            tracing::debug!("Change event with no valid snapshot, dropping");
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Item change handling failed");
    }
}
