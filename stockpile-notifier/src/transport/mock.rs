//! Mock push transport for testing
//!
//! Records every multicast call so tests can assert on the exact token
//! batches and payloads the dispatcher produced. Individual calls can be
//! scripted to fail, which is how the per-batch error-isolation property is
//! exercised.

use crate::transport::{
    MulticastMessage, MulticastOutcome, PushError, PushResult, PushTransport, FANOUT_LIMIT,
};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Recording push transport
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<MulticastMessage>>,
    // Call indices (0-based, counting all attempts) that fail
    failing_calls: Mutex<Vec<usize>>,
    calls: Mutex<usize>,
}

impl MockTransport {
    /// Creates a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the n-th send attempt (0-based) to fail
    pub async fn fail_call(&self, index: usize) {
        self.failing_calls.lock().await.push(index);
    }

    /// Returns every message that was accepted
    pub async fn sent_messages(&self) -> Vec<MulticastMessage> {
        self.sent.lock().await.clone()
    }

    /// Total send attempts, including scripted failures
    pub async fn attempted_calls(&self) -> usize {
        *self.calls.lock().await
    }
}

#[async_trait]
impl PushTransport for MockTransport {
    async fn send_multicast(&self, message: &MulticastMessage) -> PushResult<MulticastOutcome> {
        if message.tokens.len() > FANOUT_LIMIT {
            return Err(PushError::TooManyTokens(message.tokens.len()));
        }

        let call_index = {
            let mut calls = self.calls.lock().await;
            let index = *calls;
            *calls += 1;
            index
        };

        if self.failing_calls.lock().await.contains(&call_index) {
            return Err(PushError::Injected(format!("call {} failed", call_index)));
        }

        self.sent.lock().await.push(message.clone());

        Ok(MulticastOutcome {
            success_count: message.tokens.len(),
            failure_count: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_messages() {
        let transport = MockTransport::new();
        let message = MulticastMessage::new(vec!["t1".to_string()], "T", "B");

        transport.send_multicast(&message).await.unwrap();

        let sent = transport.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].tokens, vec!["t1".to_string()]);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let transport = MockTransport::new();
        transport.fail_call(0).await;

        let message = MulticastMessage::new(vec!["t1".to_string()], "T", "B");
        assert!(transport.send_multicast(&message).await.is_err());

        // Next call succeeds
        assert!(transport.send_multicast(&message).await.is_ok());
        assert_eq!(transport.attempted_calls().await, 2);
        assert_eq!(transport.sent_messages().await.len(), 1);
    }
}
