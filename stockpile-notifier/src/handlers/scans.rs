//! Daily aggregate scan handlers
//!
//! Two scheduler-driven scans, each grouping raw query results by household
//! and producing at most one notification per household per run:
//!
//! - **Expiry scan**: items expiring within the next three days, previewed
//!   as up to three distinct names plus a "+N more" suffix.
//! - **Recipe reminder**: one nudge per stocked household, with a body
//!   rotating by day of week so every household sees the same message on
//!   the same calendar day.
//!
//! Scans are system-generated: no actor is recorded and nobody is excluded
//! from the push. Households are processed concurrently; one household's
//! failure is logged and does not cancel the others.

use crate::handlers::NotificationEngine;
use chrono::{DateTime, Datelike, Duration, Utc};
use futures::future::join_all;
use std::collections::BTreeMap;
use stockpile_shared::error::StoreResult;
use stockpile_shared::models::{FoodItem, NotificationContent, NotificationKind};
use uuid::Uuid;

/// Look-ahead window for the expiry scan
const EXPIRY_LOOKAHEAD_DAYS: i64 = 3;

/// Distinct item names shown before the "+N more" suffix
const EXPIRY_PREVIEW_NAMES: usize = 3;

/// Recipe reminder bodies, indexed by day of week (Monday first)
const RECIPE_ROTATION: [&str; 7] = [
    "Start the week with a one-pot dinner from what's already on your shelves.",
    "Quick idea: a stir-fry clears out odds and ends before they age.",
    "Soup night? Your pantry probably has everything you need.",
    "Midweek tip: oldest items first makes the best casseroles.",
    "Try a traybake tonight and give your pantry a workout.",
    "Weekend ahead: plan a meal around what you already have.",
    "Sunday batch-cooking turns this week's pantry into next week's lunches.",
];

impl NotificationEngine {
    /// Runs the daily expiry scan
    ///
    /// Queries items whose expiry falls in `[now, now + 3 days]` (both
    /// bounds inclusive), groups them by household, and notifies each
    /// affected household once.
    pub async fn expiry_scan(&self, now: DateTime<Utc>) -> StoreResult<()> {
        let window_end = now + Duration::days(EXPIRY_LOOKAHEAD_DAYS);
        let items = self.store().items_expiring_between(now, window_end).await?;

        let grouped = group_by_household(items);
        tracing::info!(households = grouped.len(), "Expiry scan matched households");

        let runs = grouped.into_iter().map(|(household_id, items)| async move {
            let names = distinct_names(&items);
            let content =
                NotificationContent::new("Expiring soon", expiry_body(&names));

            if let Err(e) = self
                .notify_household(
                    household_id,
                    NotificationKind::ExpiringSoon,
                    content,
                    BTreeMap::new(),
                    None,
                    None,
                )
                .await
            {
                // Isolated: the other households' scans continue
                tracing::warn!(household_id = %household_id, error = %e, "Expiry notification failed");
            }
        });
        join_all(runs).await;

        Ok(())
    }

    /// Runs the daily recipe reminder scan
    ///
    /// Every household holding at least one pantry item gets the same
    /// day-of-week message; empty households are skipped entirely.
    pub async fn recipe_reminder_scan(&self, now: DateTime<Utc>) -> StoreResult<()> {
        let household_ids = self.store().stocked_household_ids().await?;
        let body = recipe_body_for(now);
        tracing::info!(households = household_ids.len(), "Recipe reminder scan");

        let runs = household_ids.into_iter().map(|household_id| {
            let content = NotificationContent::new("Recipe reminder", body);
            async move {
                if let Err(e) = self
                    .notify_household(
                        household_id,
                        NotificationKind::RecipeReminder,
                        content,
                        BTreeMap::new(),
                        None,
                        None,
                    )
                    .await
                {
                    tracing::warn!(household_id = %household_id, error = %e, "Recipe reminder failed");
                }
            }
        });
        join_all(runs).await;

        Ok(())
    }
}

/// Groups items by owning household, deterministically ordered
fn group_by_household(items: Vec<FoodItem>) -> BTreeMap<Uuid, Vec<FoodItem>> {
    let mut grouped: BTreeMap<Uuid, Vec<FoodItem>> = BTreeMap::new();
    for item in items {
        grouped.entry(item.household_id).or_default().push(item);
    }
    grouped
}

/// Distinct item names in first-seen order
fn distinct_names(items: &[FoodItem]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for item in items {
        if !names.contains(&item.name) {
            names.push(item.name.clone());
        }
    }
    names
}

/// Composes the expiry body from distinct names
///
/// Up to three names are previewed; the remainder collapses into a
/// "+N more" suffix. The verb agrees with the distinct-name count, not the
/// raw item count.
fn expiry_body(names: &[String]) -> String {
    let preview: Vec<&str> = names
        .iter()
        .take(EXPIRY_PREVIEW_NAMES)
        .map(String::as_str)
        .collect();
    let remaining = names.len().saturating_sub(EXPIRY_PREVIEW_NAMES);

    let listed = if remaining > 0 {
        format!("{} +{} more", preview.join(", "), remaining)
    } else {
        preview.join(", ")
    };

    let verb = if names.len() == 1 { "is" } else { "are" };
    format!("{} {} expiring soon.", listed, verb)
}

/// Picks the rotation body for the given instant's day of week
fn recipe_body_for(now: DateTime<Utc>) -> &'static str {
    RECIPE_ROTATION[now.weekday().num_days_from_monday() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn named_items(names: &[&str]) -> Vec<FoodItem> {
        let household_id = Uuid::new_v4();
        names
            .iter()
            .map(|name| FoodItem {
                id: Uuid::new_v4(),
                household_id,
                name: name.to_string(),
                added_by: Uuid::new_v4(),
                quantity: 1,
                expires_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_expiry_body_single_name_is_singular() {
        let names = vec!["Milk".to_string()];
        assert_eq!(expiry_body(&names), "Milk is expiring soon.");
    }

    #[test]
    fn test_expiry_body_three_names() {
        let names = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(expiry_body(&names), "A, B, C are expiring soon.");
    }

    #[test]
    fn test_expiry_body_four_names_previews_three() {
        let names = vec![
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
            "D".to_string(),
        ];
        assert_eq!(expiry_body(&names), "A, B, C +1 more are expiring soon.");
    }

    #[test]
    fn test_distinct_names_deduplicates_in_order() {
        let items = named_items(&["Milk", "Eggs", "Milk", "Bread"]);
        assert_eq!(distinct_names(&items), vec!["Milk", "Eggs", "Bread"]);
    }

    #[test]
    fn test_duplicate_name_pluralizes_as_singular() {
        // Two items, one distinct name: verb stays singular
        let items = named_items(&["Milk", "Milk"]);
        assert_eq!(expiry_body(&distinct_names(&items)), "Milk is expiring soon.");
    }

    #[test]
    fn test_recipe_rotation_varies_by_weekday() {
        let monday = Utc.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).unwrap();
        let tuesday = Utc.with_ymd_and_hms(2025, 6, 3, 11, 0, 0).unwrap();
        let next_monday = Utc.with_ymd_and_hms(2025, 6, 9, 11, 0, 0).unwrap();

        assert_eq!(recipe_body_for(monday), RECIPE_ROTATION[0]);
        assert_ne!(recipe_body_for(monday), recipe_body_for(tuesday));
        assert_eq!(recipe_body_for(monday), recipe_body_for(next_monday));
    }

    #[test]
    fn test_group_by_household() {
        let mut items = named_items(&["Milk", "Eggs"]);
        items.extend(named_items(&["Bread"]));

        let grouped = group_by_household(items);
        assert_eq!(grouped.len(), 2);
        let sizes: Vec<usize> = grouped.values().map(Vec::len).collect();
        assert!(sizes.contains(&2) && sizes.contains(&1));
    }
}
