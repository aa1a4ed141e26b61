//! Notification types and the household inbox record
//!
//! Every notification the worker produces is one of a closed set of kinds;
//! the string names are part of the wire contract with the mobile clients
//! (`data.type` in the push payload) and must stay stable.
//!
//! # Schema
//!
//! ```sql
//! CREATE TYPE notification_kind AS ENUM
//!     ('householdUpdate', 'expiringSoon', 'recipeReminder');
//!
//! CREATE TABLE household_inbox (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
//!     kind notification_kind NOT NULL,
//!     title VARCHAR(255) NOT NULL,
//!     body TEXT NOT NULL,
//!     actor_uid UUID,
//!     actor_name VARCHAR(255),
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! Inbox rows are append-only: this worker never updates or deletes them,
//! and there is no dedup key, so re-running a handler appends again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Closed set of notification kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    /// A member changed the shared pantry (item added/removed/updated)
    HouseholdUpdate,

    /// Daily scan found items expiring within the look-ahead window
    ExpiringSoon,

    /// Daily recipe suggestion for stocked households
    RecipeReminder,
}

impl NotificationKind {
    /// Wire name used in push payloads and the inbox enum column
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::HouseholdUpdate => "householdUpdate",
            NotificationKind::ExpiringSoon => "expiringSoon",
            NotificationKind::RecipeReminder => "recipeReminder",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Title and body of a composed notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    /// Short title shown in the system tray
    pub title: String,

    /// Body text
    pub body: String,
}

impl NotificationContent {
    /// Creates notification content
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        NotificationContent {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Persisted inbox record, visible to every current household member
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InboxRecord {
    /// Unique record ID
    pub id: Uuid,

    /// Owning household
    pub household_id: Uuid,

    /// Notification kind
    pub kind: NotificationKind,

    /// Title as pushed
    pub title: String,

    /// Body as pushed
    pub body: String,

    /// Acting user, if the notification is attributable
    pub actor_uid: Option<Uuid>,

    /// Resolved actor display name at composition time
    pub actor_name: Option<String>,

    /// Server-assigned creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a new inbox record
///
/// `id` and `created_at` are assigned by the store at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInboxRecord {
    /// Owning household
    pub household_id: Uuid,

    /// Notification kind
    pub kind: NotificationKind,

    /// Title as pushed
    pub title: String,

    /// Body as pushed
    pub body: String,

    /// Acting user, if attributable
    pub actor_uid: Option<Uuid>,

    /// Resolved actor display name
    pub actor_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(NotificationKind::HouseholdUpdate.as_str(), "householdUpdate");
        assert_eq!(NotificationKind::ExpiringSoon.as_str(), "expiringSoon");
        assert_eq!(NotificationKind::RecipeReminder.as_str(), "recipeReminder");
    }

    #[test]
    fn test_kind_serde_matches_wire_name() {
        let json = serde_json::to_string(&NotificationKind::ExpiringSoon).unwrap();
        assert_eq!(json, "\"expiringSoon\"");

        let kind: NotificationKind = serde_json::from_str("\"householdUpdate\"").unwrap();
        assert_eq!(kind, NotificationKind::HouseholdUpdate);
    }

    #[test]
    fn test_content_constructor() {
        let content = NotificationContent::new("Pantry updated", "Ada added Milk to the pantry.");
        assert_eq!(content.title, "Pantry updated");
        assert!(content.body.contains("Milk"));
    }
}
