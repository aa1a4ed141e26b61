//! Acting-user display-name resolution
//!
//! Notification bodies attribute changes to the member who made them. Name
//! resolution must never take the handler down: any absence or failure
//! degrades to a neutral fallback.

use std::sync::Arc;
use stockpile_shared::store::PantryStore;
use uuid::Uuid;

/// Fallback shown when the actor cannot be resolved
pub const FALLBACK_ACTOR_NAME: &str = "A household member";

/// Resolves acting users to display names
#[derive(Clone)]
pub struct ActorResolver {
    store: Arc<dyn PantryStore>,
}

impl ActorResolver {
    /// Creates a new resolver over the given store
    pub fn new(store: Arc<dyn PantryStore>) -> Self {
        ActorResolver { store }
    }

    /// Resolves a display name, infallibly
    ///
    /// Preference order: trimmed first+last name, then the stored display
    /// name, then [`FALLBACK_ACTOR_NAME`]. A missing uid, missing record,
    /// or failed lookup all degrade to the fallback.
    pub async fn resolve_name(&self, uid: Option<Uuid>) -> String {
        let uid = match uid {
            Some(uid) => uid,
            None => return FALLBACK_ACTOR_NAME.to_string(),
        };

        let user = match self.store.user(uid).await {
            Ok(Some(user)) => user,
            Ok(None) => return FALLBACK_ACTOR_NAME.to_string(),
            Err(e) => {
                tracing::warn!(user_id = %uid, error = %e, "Actor lookup failed, using fallback");
                return FALLBACK_ACTOR_NAME.to_string();
            }
        };

        user.full_name()
            .or_else(|| {
                user.display_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
            })
            .unwrap_or_else(|| FALLBACK_ACTOR_NAME.to_string())
    }
}
