//! Household inbox writer
//!
//! The inbox is the system of record for in-app notification history: one
//! append-only record per notification, visible to every current member,
//! written regardless of push delivery outcome. There is no dedup key, so a
//! re-delivered trigger appends a second record; the external trigger
//! system owns redelivery policy.

use std::sync::Arc;
use stockpile_shared::error::StoreResult;
use stockpile_shared::models::{InboxRecord, NewInboxRecord, NotificationContent, NotificationKind};
use stockpile_shared::store::PantryStore;
use uuid::Uuid;

/// Appends notification records to a household's inbox
#[derive(Clone)]
pub struct InboxWriter {
    store: Arc<dyn PantryStore>,
}

impl InboxWriter {
    /// Creates a new writer over the given store
    pub fn new(store: Arc<dyn PantryStore>) -> Self {
        InboxWriter { store }
    }

    /// Appends one immutable record
    ///
    /// The store assigns the creation timestamp. A failure here aborts the
    /// invocation; the push dispatch running alongside is unaffected.
    pub async fn persist(
        &self,
        household_id: Uuid,
        kind: NotificationKind,
        content: &NotificationContent,
        actor: Option<(Uuid, String)>,
    ) -> StoreResult<InboxRecord> {
        let (actor_uid, actor_name) = match actor {
            Some((uid, name)) => (Some(uid), Some(name)),
            None => (None, None),
        };

        let record = self
            .store
            .append_inbox(NewInboxRecord {
                household_id,
                kind,
                title: content.title.clone(),
                body: content.body.clone(),
                actor_uid,
                actor_name,
            })
            .await?;

        tracing::debug!(
            household_id = %household_id,
            kind = %kind,
            record_id = %record.id,
            "Inbox record appended"
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockpile_shared::store::MemoryStore;

    #[tokio::test]
    async fn test_persist_appends_with_actor() {
        let store = Arc::new(MemoryStore::new());
        let writer = InboxWriter::new(store.clone());
        let household_id = Uuid::new_v4();
        let actor_uid = Uuid::new_v4();

        let content = NotificationContent::new("Pantry updated", "Ada added Milk to the pantry.");
        writer
            .persist(
                household_id,
                NotificationKind::HouseholdUpdate,
                &content,
                Some((actor_uid, "Ada Lovelace".to_string())),
            )
            .await
            .unwrap();

        let inbox = store.inbox_snapshot().await;
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].actor_uid, Some(actor_uid));
        assert_eq!(inbox[0].actor_name.as_deref(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_persist_is_not_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let writer = InboxWriter::new(store.clone());
        let household_id = Uuid::new_v4();
        let content = NotificationContent::new("Expiring soon", "Milk is expiring soon.");

        for _ in 0..2 {
            writer
                .persist(household_id, NotificationKind::ExpiringSoon, &content, None)
                .await
                .unwrap();
        }

        // Append-only, no dedup key: same input, two records
        assert_eq!(store.inbox_snapshot().await.len(), 2);
    }
}
