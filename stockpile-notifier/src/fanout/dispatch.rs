//! Push dispatch
//!
//! Sends a composed notification to a token set: batches to the provider
//! limit, fires all batches concurrently, and returns once every batch has
//! been attempted. A batch failure is logged and swallowed so partial
//! delivery never aborts the broader notification transaction; the inbox
//! write alongside it proceeds regardless.

use crate::fanout::batch_tokens;
use crate::transport::{MulticastMessage, PushTransport, FANOUT_LIMIT};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use stockpile_shared::models::{NotificationContent, NotificationKind};

/// Best-effort push dispatcher
#[derive(Clone)]
pub struct PushDispatcher {
    transport: Arc<dyn PushTransport>,
}

impl PushDispatcher {
    /// Creates a new dispatcher over the given transport
    pub fn new(transport: Arc<dyn PushTransport>) -> Self {
        PushDispatcher { transport }
    }

    /// Dispatches a notification to every token, best-effort
    ///
    /// An empty token set is a no-op: no network call is issued. Every
    /// batch is attempted even when siblings fail; batch outcomes are only
    /// observable in the logs.
    pub async fn dispatch(
        &self,
        tokens: &[String],
        kind: NotificationKind,
        content: &NotificationContent,
        extra_data: BTreeMap<String, String>,
    ) {
        if tokens.is_empty() {
            tracing::debug!(kind = %kind, "No recipient tokens, skipping push");
            return;
        }

        let mut data = extra_data;
        data.insert("type".to_string(), kind.as_str().to_string());

        let batches = batch_tokens(tokens, FANOUT_LIMIT);
        let sends = batches.into_iter().enumerate().map(|(index, batch)| {
            let transport = self.transport.clone();
            let message = MulticastMessage {
                tokens: batch,
                title: content.title.clone(),
                body: content.body.clone(),
                data: data.clone(),
            };
            async move {
                match transport.send_multicast(&message).await {
                    Ok(outcome) => {
                        tracing::info!(
                            kind = %kind,
                            batch = index,
                            success = outcome.success_count,
                            failure = outcome.failure_count,
                            "Push batch delivered"
                        );
                    }
                    Err(e) => {
                        // Isolated: sibling batches and the inbox write continue
                        tracing::warn!(kind = %kind, batch = index, error = %e, "Push batch failed");
                    }
                }
            }
        });

        join_all(sends).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    fn content() -> NotificationContent {
        NotificationContent::new("Pantry updated", "Ada added Milk to the pantry.")
    }

    #[tokio::test]
    async fn test_empty_tokens_issue_no_call() {
        let transport = Arc::new(MockTransport::new());
        let dispatcher = PushDispatcher::new(transport.clone());

        dispatcher
            .dispatch(&[], NotificationKind::HouseholdUpdate, &content(), BTreeMap::new())
            .await;

        assert_eq!(transport.attempted_calls().await, 0);
    }

    #[tokio::test]
    async fn test_data_payload_carries_type() {
        let transport = Arc::new(MockTransport::new());
        let dispatcher = PushDispatcher::new(transport.clone());

        let mut extra = BTreeMap::new();
        extra.insert("itemName".to_string(), "Milk".to_string());
        dispatcher
            .dispatch(
                &["t1".to_string()],
                NotificationKind::HouseholdUpdate,
                &content(),
                extra,
            )
            .await;

        let sent = transport.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].data.get("type").map(String::as_str), Some("householdUpdate"));
        assert_eq!(sent[0].data.get("itemName").map(String::as_str), Some("Milk"));
    }

    #[tokio::test]
    async fn test_large_fanout_is_batched() {
        let transport = Arc::new(MockTransport::new());
        let dispatcher = PushDispatcher::new(transport.clone());

        let tokens: Vec<String> = (0..1201).map(|i| format!("t{}", i)).collect();
        dispatcher
            .dispatch(&tokens, NotificationKind::ExpiringSoon, &content(), BTreeMap::new())
            .await;

        let sent = transport.sent_messages().await;
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|m| m.tokens.len() <= FANOUT_LIMIT));
        assert_eq!(sent.iter().map(|m| m.tokens.len()).sum::<usize>(), 1201);
    }

    #[tokio::test]
    async fn test_one_failing_batch_does_not_stop_siblings() {
        let transport = Arc::new(MockTransport::new());
        transport.fail_call(0).await;
        let dispatcher = PushDispatcher::new(transport.clone());

        let tokens: Vec<String> = (0..1000).map(|i| format!("t{}", i)).collect();
        dispatcher
            .dispatch(&tokens, NotificationKind::ExpiringSoon, &content(), BTreeMap::new())
            .await;

        // Both batches attempted, one recorded
        assert_eq!(transport.attempted_calls().await, 2);
        assert_eq!(transport.sent_messages().await.len(), 1);
    }
}
