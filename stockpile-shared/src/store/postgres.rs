//! PostgreSQL store backend
//!
//! Production implementation of [`PantryStore`] over sqlx. Membership is a
//! `household_members` join table aggregated into the household row at read
//! time; the inbox append relies on column defaults for the id and the
//! server-assigned creation timestamp.
//!
//! Pool construction lives here too so the binary has a single place to
//! stand up its database access.

use crate::error::StoreResult;
use crate::models::{FoodItem, Household, InboxRecord, NewInboxRecord, User};
use crate::store::PantryStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use uuid::Uuid;

/// Creates and health-checks a PostgreSQL connection pool
///
/// # Errors
///
/// Returns an error if the URL is invalid or the database is unreachable.
pub async fn create_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .connect(url)
        .await?;

    // Verify connectivity before handing the pool out
    sqlx::query("SELECT 1").execute(&pool).await?;
    tracing::info!(max_connections, "Database pool ready");

    Ok(pool)
}

/// PostgreSQL-backed pantry store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl PantryStore for PgStore {
    async fn household(&self, id: Uuid) -> StoreResult<Option<Household>> {
        let household = sqlx::query_as::<_, Household>(
            r#"
            SELECT h.id, h.name,
                   COALESCE(
                       array_agg(m.user_id) FILTER (WHERE m.user_id IS NOT NULL),
                       '{}'
                   ) AS member_ids
            FROM households h
            LEFT JOIN household_members m ON m.household_id = h.id
            WHERE h.id = $1
            GROUP BY h.id, h.name
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(household)
    }

    async fn user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, display_name, push_token
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn items_expiring_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<FoodItem>> {
        let items = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT id, household_id, name, added_by, quantity, expires_at
            FROM food_items
            WHERE expires_at >= $1 AND expires_at <= $2
            ORDER BY expires_at ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn stocked_household_ids(&self) -> StoreResult<Vec<Uuid>> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT DISTINCT household_id FROM food_items")
                .fetch_all(&self.pool)
                .await?;

        Ok(ids)
    }

    async fn append_inbox(&self, record: NewInboxRecord) -> StoreResult<InboxRecord> {
        let inserted = sqlx::query_as::<_, InboxRecord>(
            r#"
            INSERT INTO household_inbox (household_id, kind, title, body, actor_uid, actor_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, household_id, kind, title, body, actor_uid, actor_name, created_at
            "#,
        )
        .bind(record.household_id)
        .bind(record.kind)
        .bind(record.title)
        .bind(record.body)
        .bind(record.actor_uid)
        .bind(record.actor_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }
}
