//! Storage contract for the notifier
//!
//! The document store is an external collaborator; every component that
//! touches it receives a `PantryStore` handle at construction so tests can
//! substitute the in-memory backend. The worker holds no authoritative
//! state: membership, users, and items are re-read fresh on every handler
//! invocation, and the inbox append is the only write.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use stockpile_shared::store::{PantryStore, postgres::PgStore};
//!
//! # async fn example(pool: sqlx::PgPool) -> anyhow::Result<()> {
//! let store: Arc<dyn PantryStore> = Arc::new(PgStore::new(pool));
//! let household = store.household(uuid::Uuid::new_v4()).await?;
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod postgres;

use crate::error::StoreResult;
use crate::models::{FoodItem, Household, InboxRecord, NewInboxRecord, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Read/append access to pantry state
///
/// Missing records are `Ok(None)` / empty collections, never errors: a
/// vanished household or user is a benign race with the management flows.
#[async_trait]
pub trait PantryStore: Send + Sync {
    /// Fetches a household with its current member set
    async fn household(&self, id: Uuid) -> StoreResult<Option<Household>>;

    /// Fetches a user record
    async fn user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Lists items whose expiry falls inside the window, inclusive of both
    /// bounds
    async fn items_expiring_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<FoodItem>>;

    /// Lists households that currently hold at least one pantry item
    async fn stocked_household_ids(&self) -> StoreResult<Vec<Uuid>>;

    /// Appends one immutable record to a household's inbox
    ///
    /// The store assigns `id` and `created_at`. Records are never mutated or
    /// deleted by this worker; retention is an external concern.
    async fn append_inbox(&self, record: NewInboxRecord) -> StoreResult<InboxRecord>;
}
