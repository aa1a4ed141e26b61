//! Household model
//!
//! A household is a group of users sharing one pantry inventory and one
//! notification inbox. Membership is mutated by the join/leave flows in the
//! main backend; the notifier only reads it, freshly on every invocation.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE households (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     name VARCHAR(255) NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//!
//! CREATE TABLE household_members (
//!     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
//!     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     PRIMARY KEY (household_id, user_id)
//! );
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Household with its current member set
///
/// Member order carries no meaning; the set is aggregated from the
/// `household_members` join table at read time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Household {
    /// Unique household ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// User IDs of all current members
    pub member_ids: Vec<Uuid>,
}

impl Household {
    /// Returns the member set without the given user
    ///
    /// Used when an actor-attributable notification must not push back to
    /// the actor's own device. `None` excludes nobody (system-generated
    /// scans notify every member).
    pub fn members_excluding(&self, excluded: Option<Uuid>) -> Vec<Uuid> {
        self.member_ids
            .iter()
            .copied()
            .filter(|id| Some(*id) != excluded)
            .collect()
    }
}
