//! Event handlers
//!
//! One handler per triggering condition, each composing the fan-out
//! components into a single notification transaction:
//!
//! ```text
//! NotificationEngine
//!   ├─> ActorResolver: who did this (attributable events only)
//!   ├─> compose title/body (fixed per trigger type)
//!   ├─> MembershipResolver: recipient tokens
//!   └─> PushDispatcher ‖ InboxWriter: fire both, join both
//! ```
//!
//! Handlers are stateless across invocations and hold no cache; concurrent
//! invocations for different households share nothing mutable. Push
//! dispatch and the inbox append run concurrently and are both attempted
//! even when one fails; only store failures abort an invocation, and only
//! that invocation.

pub mod item_events;
pub mod scans;

use crate::actor::ActorResolver;
use crate::fanout::{MembershipResolver, PushDispatcher};
use crate::inbox::InboxWriter;
use crate::transport::PushTransport;
use std::collections::BTreeMap;
use std::sync::Arc;
use stockpile_shared::error::StoreResult;
use stockpile_shared::models::{NotificationContent, NotificationKind};
use stockpile_shared::store::PantryStore;
use uuid::Uuid;

/// The notification fan-out engine
///
/// Owns a store handle and the components built over it. Construct once and
/// share via `Arc`; every method is an independent unit of work.
pub struct NotificationEngine {
    store: Arc<dyn PantryStore>,
    membership: MembershipResolver,
    dispatcher: PushDispatcher,
    inbox: InboxWriter,
    actors: ActorResolver,
}

impl NotificationEngine {
    /// Creates an engine over the given store and push transport
    pub fn new(store: Arc<dyn PantryStore>, transport: Arc<dyn PushTransport>) -> Self {
        NotificationEngine {
            membership: MembershipResolver::new(store.clone()),
            dispatcher: PushDispatcher::new(transport),
            inbox: InboxWriter::new(store.clone()),
            actors: ActorResolver::new(store.clone()),
            store,
        }
    }

    pub(crate) fn store(&self) -> &Arc<dyn PantryStore> {
        &self.store
    }

    pub(crate) fn actors(&self) -> &ActorResolver {
        &self.actors
    }

    /// Runs one notification transaction for a household
    ///
    /// Resolves recipient tokens (optionally excluding the actor's device),
    /// then fires the push dispatch and the inbox append concurrently. Push
    /// failures are already swallowed per batch inside the dispatcher; the
    /// inbox result is the transaction's result.
    pub(crate) async fn notify_household(
        &self,
        household_id: Uuid,
        kind: NotificationKind,
        content: NotificationContent,
        extra_data: BTreeMap<String, String>,
        actor: Option<(Uuid, String)>,
        exclude_from_push: Option<Uuid>,
    ) -> StoreResult<()> {
        let tokens = self
            .membership
            .resolve_tokens(household_id, exclude_from_push)
            .await?;

        let ((), persisted) = tokio::join!(
            self.dispatcher.dispatch(&tokens, kind, &content, extra_data),
            self.inbox.persist(household_id, kind, &content, actor),
        );
        persisted?;

        tracing::info!(
            household_id = %household_id,
            kind = %kind,
            recipients = tokens.len(),
            "Notification transaction complete"
        );

        Ok(())
    }
}
