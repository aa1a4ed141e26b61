//! Household membership resolution
//!
//! Resolves a household ID to the device tokens of its current members,
//! optionally excluding the acting member so people are not pushed about
//! their own edits.
//!
//! Membership and tokens are re-read fresh on every call; the resolver
//! caches nothing across invocations.

use futures::future::join_all;
use std::sync::Arc;
use stockpile_shared::error::StoreResult;
use stockpile_shared::store::PantryStore;
use uuid::Uuid;

/// Resolves household members to push tokens
#[derive(Clone)]
pub struct MembershipResolver {
    store: Arc<dyn PantryStore>,
}

impl MembershipResolver {
    /// Creates a new resolver over the given store
    pub fn new(store: Arc<dyn PantryStore>) -> Self {
        MembershipResolver { store }
    }

    /// Collects the push tokens of every member except `excluded`
    ///
    /// A missing household is a benign race with the join/leave flows and
    /// yields an empty set. Member lookups run concurrently; a member whose
    /// lookup fails or who has no usable token is skipped without affecting
    /// the others. Only the household lookup itself propagates an error.
    ///
    /// Duplicate tokens across members are preserved here; in practice each
    /// user holds at most one token.
    pub async fn resolve_tokens(
        &self,
        household_id: Uuid,
        excluded: Option<Uuid>,
    ) -> StoreResult<Vec<String>> {
        let household = match self.store.household(household_id).await? {
            Some(household) => household,
            None => {
                tracing::debug!(household_id = %household_id, "Household vanished, no recipients");
                return Ok(Vec::new());
            }
        };

        let lookups = household
            .members_excluding(excluded)
            .into_iter()
            .map(|member_id| {
                let store = self.store.clone();
                async move { (member_id, store.user(member_id).await) }
            });

        let mut tokens = Vec::new();
        for (member_id, result) in join_all(lookups).await {
            match result {
                Ok(Some(user)) => {
                    if let Some(token) = user.usable_token() {
                        tokens.push(token.to_string());
                    }
                }
                Ok(None) => {
                    tracing::debug!(user_id = %member_id, "Member record missing, skipping");
                }
                Err(e) => {
                    // Partial-result semantics: skip, don't abort
                    tracing::warn!(user_id = %member_id, error = %e, "Member lookup failed, skipping");
                }
            }
        }

        Ok(tokens)
    }
}
