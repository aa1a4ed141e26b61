//! Pantry item model
//!
//! Items are created, updated, and deleted by the pantry-management flows;
//! the notifier only observes state transitions via the change feed and
//! queries upcoming expiries for the daily scan.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE food_items (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
//!     name VARCHAR(255) NOT NULL,
//!     added_by UUID NOT NULL REFERENCES users(id),
//!     quantity INTEGER NOT NULL DEFAULT 1,
//!     expires_at TIMESTAMPTZ NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pantry item belonging to exactly one household
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FoodItem {
    /// Unique item ID
    pub id: Uuid,

    /// Owning household
    pub household_id: Uuid,

    /// Item name as entered by the member
    pub name: String,

    /// User who added the item
    pub added_by: Uuid,

    /// Current quantity
    pub quantity: i32,

    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
}

impl FoodItem {
    /// Whether a change from `self` to `after` is material to other members
    ///
    /// Only quantity and expiry changes notify; renames and other cosmetic
    /// edits stay silent.
    pub fn materially_differs_from(&self, after: &FoodItem) -> bool {
        self.quantity != after.quantity || self.expires_at != after.expires_at
    }
}
