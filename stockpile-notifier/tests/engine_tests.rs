//! End-to-end engine tests against the in-memory store and mock transport.
//!
//! These drive whole notification transactions the way the change feed and
//! scheduler do, and assert on both delivery surfaces: the multicast calls
//! the transport saw and the records appended to the household inbox.

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use stockpile_notifier::changefeed::{handle_event, ItemChangeEvent, ItemSnapshot};
use stockpile_notifier::handlers::NotificationEngine;
use stockpile_notifier::transport::MockTransport;
use stockpile_shared::models::{FoodItem, Household, NotificationKind, User};
use stockpile_shared::store::MemoryStore;
use uuid::Uuid;

struct Harness {
    store: Arc<MemoryStore>,
    transport: Arc<MockTransport>,
    engine: NotificationEngine,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(MockTransport::new());
    let engine = NotificationEngine::new(store.clone(), transport.clone());
    Harness {
        store,
        transport,
        engine,
    }
}

async fn seed_household(store: &MemoryStore, member_tokens: &[&str]) -> Uuid {
    let household_id = Uuid::new_v4();
    let mut member_ids = Vec::new();
    for token in member_tokens {
        let user = User {
            id: Uuid::new_v4(),
            first_name: None,
            last_name: None,
            display_name: None,
            push_token: Some(token.to_string()),
        };
        member_ids.push(user.id);
        store.insert_user(user).await;
    }
    store
        .insert_household(Household {
            id: household_id,
            name: "Household".to_string(),
            member_ids,
        })
        .await;
    household_id
}

fn expiring_item(household_id: Uuid, name: &str, expires_at: chrono::DateTime<Utc>) -> FoodItem {
    FoodItem {
        id: Uuid::new_v4(),
        household_id,
        name: name.to_string(),
        added_by: Uuid::new_v4(),
        quantity: 1,
        expires_at,
    }
}

#[tokio::test]
async fn expiry_scan_groups_by_household_and_respects_window() {
    let h = harness();
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).unwrap();

    let first = seed_household(&h.store, &["h1-token"]).await;
    let second = seed_household(&h.store, &["h2-token"]).await;

    h.store
        .insert_item(expiring_item(first, "Milk", now + Duration::hours(1)))
        .await;
    h.store
        .insert_item(expiring_item(second, "Eggs", now + Duration::days(2)))
        .await;
    // Outside the 3-day window: never notified
    h.store
        .insert_item(expiring_item(second, "Cheese", now + Duration::days(4)))
        .await;

    h.engine.expiry_scan(now).await.unwrap();

    let inbox = h.store.inbox_snapshot().await;
    assert_eq!(inbox.len(), 2);

    let first_record = inbox.iter().find(|r| r.household_id == first).unwrap();
    assert_eq!(first_record.body, "Milk is expiring soon.");
    assert_eq!(first_record.kind, NotificationKind::ExpiringSoon);
    assert!(first_record.actor_uid.is_none());

    let second_record = inbox.iter().find(|r| r.household_id == second).unwrap();
    assert_eq!(second_record.body, "Eggs is expiring soon.");
    assert!(!second_record.body.contains("Cheese"));

    let sent = h.transport.sent_messages().await;
    assert_eq!(sent.len(), 2);
    assert!(sent
        .iter()
        .all(|m| m.data.get("type").map(String::as_str) == Some("expiringSoon")));
}

#[tokio::test]
async fn expiry_scan_previews_three_names_and_counts_the_rest() {
    let h = harness();
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).unwrap();
    let household = seed_household(&h.store, &["token"]).await;

    for (i, name) in ["Apples", "Bread", "Carrots", "Dates"].iter().enumerate() {
        h.store
            .insert_item(expiring_item(
                household,
                name,
                now + Duration::hours(i as i64 + 1),
            ))
            .await;
    }

    h.engine.expiry_scan(now).await.unwrap();

    let inbox = h.store.inbox_snapshot().await;
    assert_eq!(inbox.len(), 1);
    assert_eq!(
        inbox[0].body,
        "Apples, Bread, Carrots +1 more are expiring soon."
    );
}

#[tokio::test]
async fn recipe_reminder_skips_empty_households_and_repeats_one_body() {
    let h = harness();
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).unwrap();

    let stocked_a = seed_household(&h.store, &["a-token"]).await;
    let stocked_b = seed_household(&h.store, &["b-token"]).await;
    let empty = seed_household(&h.store, &["empty-token"]).await;

    h.store
        .insert_item(expiring_item(stocked_a, "Rice", now + Duration::days(30)))
        .await;
    h.store
        .insert_item(expiring_item(stocked_b, "Pasta", now + Duration::days(30)))
        .await;

    h.engine.recipe_reminder_scan(now).await.unwrap();

    let inbox = h.store.inbox_snapshot().await;
    assert_eq!(inbox.len(), 2);
    assert!(inbox.iter().all(|r| r.household_id != empty));
    assert!(inbox.iter().all(|r| r.kind == NotificationKind::RecipeReminder));

    // Same scan run, same body for every household
    assert_eq!(inbox[0].body, inbox[1].body);
}

#[tokio::test]
async fn recipe_reminder_body_is_stable_for_the_same_weekday() {
    let h = harness();
    let monday = Utc.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).unwrap();
    let household = seed_household(&h.store, &["token"]).await;
    h.store
        .insert_item(expiring_item(household, "Rice", monday + Duration::days(30)))
        .await;

    h.engine.recipe_reminder_scan(monday).await.unwrap();
    h.engine
        .recipe_reminder_scan(monday + Duration::weeks(1))
        .await
        .unwrap();

    let inbox = h.store.inbox_snapshot().await;
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0].body, inbox[1].body);
}

#[tokio::test]
async fn change_event_without_household_target_is_a_silent_no_op() {
    let h = harness();

    let event = ItemChangeEvent {
        before: None,
        after: Some(ItemSnapshot {
            id: Some(Uuid::new_v4()),
            household_id: None,
            name: Some("Milk".to_string()),
            added_by: Some(Uuid::new_v4()),
            quantity: Some(1),
            expires_at: Some(Utc::now()),
        }),
    };

    handle_event(&h.engine, event).await;

    assert!(h.store.inbox_snapshot().await.is_empty());
    assert_eq!(h.transport.attempted_calls().await, 0);
}

#[tokio::test]
async fn created_event_flows_from_feed_payload_to_both_surfaces() {
    let h = harness();
    let household = seed_household(&h.store, &["member-token"]).await;

    let event = ItemChangeEvent {
        before: None,
        after: Some(ItemSnapshot {
            id: Some(Uuid::new_v4()),
            household_id: Some(household),
            name: Some("Milk".to_string()),
            added_by: Some(Uuid::new_v4()),
            quantity: Some(1),
            expires_at: Some(Utc::now() + Duration::days(5)),
        }),
    };

    handle_event(&h.engine, event).await;

    let inbox = h.store.inbox_snapshot().await;
    assert_eq!(inbox.len(), 1);
    // Unknown adder degrades to the fallback actor name
    assert_eq!(
        inbox[0].body,
        "A household member added Milk to the pantry."
    );

    let sent = h.transport.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].tokens, vec!["member-token".to_string()]);
}

#[tokio::test]
async fn rerunning_a_handler_appends_again() {
    let h = harness();
    let household = seed_household(&h.store, &["token"]).await;
    let item = expiring_item(household, "Milk", Utc::now() + Duration::days(5));

    h.engine.item_created(&item).await.unwrap();
    h.engine.item_created(&item).await.unwrap();

    // Append-only with no dedup key: same trigger, two records
    assert_eq!(h.store.inbox_snapshot().await.len(), 2);
}
