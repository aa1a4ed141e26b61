//! In-memory store backend for tests and local runs
//!
//! Implements [`PantryStore`] over `tokio::sync::RwLock` maps. Used by the
//! notifier's integration tests and handy for running the worker without a
//! database.
//!
//! Supports fault injection: individual user lookups can be made to fail so
//! the membership resolver's skip-don't-abort semantics are testable.
//!
//! # Example
//!
//! ```
//! use stockpile_shared::store::MemoryStore;
//! use stockpile_shared::models::Household;
//! use uuid::Uuid;
//!
//! # async fn example() {
//! let store = MemoryStore::new();
//! store
//!     .insert_household(Household {
//!         id: Uuid::new_v4(),
//!         name: "Flat 4".to_string(),
//!         member_ids: vec![],
//!     })
//!     .await;
//! # }
//! ```

use crate::error::{StoreError, StoreResult};
use crate::models::{FoodItem, Household, InboxRecord, NewInboxRecord, User};
use crate::store::PantryStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory pantry store
#[derive(Default)]
pub struct MemoryStore {
    households: RwLock<HashMap<Uuid, Household>>,
    users: RwLock<HashMap<Uuid, User>>,
    items: RwLock<HashMap<Uuid, FoodItem>>,
    inbox: RwLock<Vec<InboxRecord>>,
    failing_users: RwLock<HashSet<Uuid>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a household
    pub async fn insert_household(&self, household: Household) {
        self.households
            .write()
            .await
            .insert(household.id, household);
    }

    /// Inserts or replaces a user
    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Inserts or replaces a pantry item
    pub async fn insert_item(&self, item: FoodItem) {
        self.items.write().await.insert(item.id, item);
    }

    /// Makes every subsequent lookup of this user fail
    ///
    /// Models a corrupt or unreachable user document.
    pub async fn fail_user_lookups(&self, id: Uuid) {
        self.failing_users.write().await.insert(id);
    }

    /// Returns a snapshot of the appended inbox records
    pub async fn inbox_snapshot(&self) -> Vec<InboxRecord> {
        self.inbox.read().await.clone()
    }
}

#[async_trait]
impl PantryStore for MemoryStore {
    async fn household(&self, id: Uuid) -> StoreResult<Option<Household>> {
        Ok(self.households.read().await.get(&id).cloned())
    }

    async fn user(&self, id: Uuid) -> StoreResult<Option<User>> {
        if self.failing_users.read().await.contains(&id) {
            return Err(StoreError::Injected(format!("user lookup failed: {}", id)));
        }
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn items_expiring_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<FoodItem>> {
        let mut items: Vec<FoodItem> = self
            .items
            .read()
            .await
            .values()
            .filter(|item| item.expires_at >= from && item.expires_at <= to)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.expires_at);

        Ok(items)
    }

    async fn stocked_household_ids(&self) -> StoreResult<Vec<Uuid>> {
        let mut ids: Vec<Uuid> = self
            .items
            .read()
            .await
            .values()
            .map(|item| item.household_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        ids.sort();

        Ok(ids)
    }

    async fn append_inbox(&self, record: NewInboxRecord) -> StoreResult<InboxRecord> {
        let inserted = InboxRecord {
            id: Uuid::new_v4(),
            household_id: record.household_id,
            kind: record.kind,
            title: record.title,
            body: record.body,
            actor_uid: record.actor_uid,
            actor_name: record.actor_name,
            created_at: Utc::now(),
        };
        self.inbox.write().await.push(inserted.clone());

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationKind;
    use chrono::{Duration, TimeZone};

    #[tokio::test]
    async fn test_missing_household_is_none() {
        let store = MemoryStore::new();
        let found = store.household(Uuid::new_v4()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_expiry_window_is_inclusive() {
        let store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap();
        let household_id = Uuid::new_v4();

        for (name, offset) in [("Lower", Duration::zero()), ("Upper", Duration::days(3))] {
            store
                .insert_item(FoodItem {
                    id: Uuid::new_v4(),
                    household_id,
                    name: name.to_string(),
                    added_by: Uuid::new_v4(),
                    quantity: 1,
                    expires_at: now + offset,
                })
                .await;
        }
        store
            .insert_item(FoodItem {
                id: Uuid::new_v4(),
                household_id,
                name: "Outside".to_string(),
                added_by: Uuid::new_v4(),
                quantity: 1,
                expires_at: now + Duration::days(3) + Duration::seconds(1),
            })
            .await;

        let items = store
            .items_expiring_between(now, now + Duration::days(3))
            .await
            .unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Lower", "Upper"]);
    }

    #[tokio::test]
    async fn test_fail_user_lookups() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store
            .insert_user(User {
                id,
                first_name: None,
                last_name: None,
                display_name: None,
                push_token: None,
            })
            .await;
        store.fail_user_lookups(id).await;

        assert!(store.user(id).await.is_err());
    }

    #[tokio::test]
    async fn test_append_inbox_assigns_id_and_timestamp() {
        let store = MemoryStore::new();
        let household_id = Uuid::new_v4();

        let record = store
            .append_inbox(NewInboxRecord {
                household_id,
                kind: NotificationKind::HouseholdUpdate,
                title: "Pantry updated".to_string(),
                body: "Ada added Milk to the pantry.".to_string(),
                actor_uid: None,
                actor_name: None,
            })
            .await
            .unwrap();

        assert_eq!(record.household_id, household_id);
        assert_eq!(store.inbox_snapshot().await.len(), 1);
    }
}
