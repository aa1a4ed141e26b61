//! User model
//!
//! Users are owned by the identity flows; the notifier reads them to resolve
//! display names and push tokens. At most one push token is registered per
//! user (last registration overwrites), so token fan-out is one device per
//! member.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     first_name VARCHAR(255),
//!     last_name VARCHAR(255),
//!     display_name VARCHAR(255),
//!     push_token VARCHAR(512),
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account as seen by the notifier
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Optional first name
    pub first_name: Option<String>,

    /// Optional last name
    pub last_name: Option<String>,

    /// Optional free-form display name
    pub display_name: Option<String>,

    /// Registered push token, if any (last registration wins)
    pub push_token: Option<String>,
}

impl User {
    /// Returns the user's full name, if one can be assembled
    ///
    /// Concatenates first and last name, trimming whitespace. Returns None
    /// when both parts are absent or blank, so callers can fall through to
    /// the stored display name.
    pub fn full_name(&self) -> Option<String> {
        let first = self.first_name.as_deref().unwrap_or("").trim();
        let last = self.last_name.as_deref().unwrap_or("").trim();

        let full = format!("{} {}", first, last);
        let full = full.trim();
        if full.is_empty() {
            None
        } else {
            Some(full.to_string())
        }
    }

    /// Returns the registered push token if present and non-empty
    pub fn usable_token(&self) -> Option<&str> {
        self.push_token.as_deref().filter(|t| !t.is_empty())
    }
}
