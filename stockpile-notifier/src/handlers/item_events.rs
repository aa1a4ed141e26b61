//! Pantry item event handlers
//!
//! Invoked by the change-feed consumer with validated before/after
//! snapshots whenever a pantry item record changes. Each produces one
//! `householdUpdate` notification, attributed to the acting member and
//! excluded from that member's own device.
//!
//! The update handler applies a materiality filter: only quantity or
//! expiry changes notify. Renames and other cosmetic edits would spam the
//! household without telling anyone anything actionable.

use crate::handlers::NotificationEngine;
use std::collections::BTreeMap;
use stockpile_shared::error::StoreResult;
use stockpile_shared::models::{FoodItem, NotificationContent, NotificationKind};

/// Title for all member-attributable pantry changes
const PANTRY_UPDATE_TITLE: &str = "Pantry updated";

impl NotificationEngine {
    /// Handles a newly created pantry item
    pub async fn item_created(&self, item: &FoodItem) -> StoreResult<()> {
        let actor_name = self.actors().resolve_name(Some(item.added_by)).await;
        let content = NotificationContent::new(
            PANTRY_UPDATE_TITLE,
            format!("{} added {} to the pantry.", actor_name, item.name),
        );

        self.notify_household(
            item.household_id,
            NotificationKind::HouseholdUpdate,
            content,
            item_data(item),
            Some((item.added_by, actor_name)),
            Some(item.added_by),
        )
        .await
    }

    /// Handles a deleted pantry item
    ///
    /// Attribution goes to `added_by`: the trigger payload carries no
    /// deleting user, so the original adder stands in for the actor.
    pub async fn item_deleted(&self, item: &FoodItem) -> StoreResult<()> {
        let actor_name = self.actors().resolve_name(Some(item.added_by)).await;
        let content = NotificationContent::new(
            PANTRY_UPDATE_TITLE,
            format!("{} removed {} from the pantry.", actor_name, item.name),
        );

        self.notify_household(
            item.household_id,
            NotificationKind::HouseholdUpdate,
            content,
            item_data(item),
            Some((item.added_by, actor_name)),
            Some(item.added_by),
        )
        .await
    }

    /// Handles an updated pantry item
    ///
    /// Silent no-op unless quantity or expiry changed between the
    /// snapshots.
    pub async fn item_updated(&self, before: &FoodItem, after: &FoodItem) -> StoreResult<()> {
        if !before.materially_differs_from(after) {
            tracing::debug!(item_id = %after.id, "Cosmetic item update, not notifying");
            return Ok(());
        }

        let actor_name = self.actors().resolve_name(Some(after.added_by)).await;
        let content = NotificationContent::new(
            PANTRY_UPDATE_TITLE,
            format!("{} updated {} in the pantry.", actor_name, after.name),
        );

        self.notify_household(
            after.household_id,
            NotificationKind::HouseholdUpdate,
            content,
            item_data(after),
            Some((after.added_by, actor_name)),
            Some(after.added_by),
        )
        .await
    }
}

/// Custom push data for item-level notifications
fn item_data(item: &FoodItem) -> BTreeMap<String, String> {
    let mut data = BTreeMap::new();
    data.insert("itemName".to_string(), item.name.clone());
    data
}
