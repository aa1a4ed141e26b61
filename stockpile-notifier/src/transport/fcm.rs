//! FCM multicast client
//!
//! Sends one JSON POST per batch against an FCM-style multicast endpoint,
//! authenticated with a server key. The endpoint is configurable so tests
//! can point it at a local mock server.
//!
//! # Request shape
//!
//! ```json
//! {
//!   "registration_ids": ["token-1", "token-2"],
//!   "notification": { "title": "...", "body": "..." },
//!   "android": {
//!     "priority": "high",
//!     "notification": { "channel_id": "stockpile_pantry", "sound": "default" }
//!   },
//!   "apns": {
//!     "payload": { "aps": { "sound": "default", "badge": 1 } }
//!   },
//!   "data": { "type": "householdUpdate", "itemName": "Milk" }
//! }
//! ```

use crate::transport::{
    MulticastMessage, MulticastOutcome, PushError, PushResult, PushTransport, ANDROID_CHANNEL_ID,
    FANOUT_LIMIT,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Response body returned by the multicast endpoint
#[derive(Debug, Deserialize)]
struct FcmResponse {
    #[serde(default)]
    success: usize,
    #[serde(default)]
    failure: usize,
}

/// FCM-backed push transport
#[derive(Clone)]
pub struct FcmTransport {
    client: reqwest::Client,
    endpoint: String,
    server_key: String,
}

impl FcmTransport {
    /// Creates a new transport
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Multicast endpoint URL
    /// * `server_key` - Server key for the `Authorization` header
    pub fn new(endpoint: impl Into<String>, server_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        FcmTransport {
            client,
            endpoint: endpoint.into(),
            server_key: server_key.into(),
        }
    }

    /// Builds the provider request body for one batch
    ///
    /// Platform options are fixed: high priority plus the pantry channel on
    /// Android, default sound plus a badge increment on APNs. Data values
    /// are already strings by construction.
    fn request_body(message: &MulticastMessage) -> serde_json::Value {
        serde_json::json!({
            "registration_ids": message.tokens,
            "notification": {
                "title": message.title,
                "body": message.body,
            },
            "android": {
                "priority": "high",
                "notification": {
                    "channel_id": ANDROID_CHANNEL_ID,
                    "sound": "default",
                },
            },
            "apns": {
                "payload": {
                    "aps": {
                        "sound": "default",
                        "badge": 1,
                    },
                },
            },
            "data": message.data,
        })
    }
}

#[async_trait]
impl PushTransport for FcmTransport {
    async fn send_multicast(&self, message: &MulticastMessage) -> PushResult<MulticastOutcome> {
        if message.tokens.len() > FANOUT_LIMIT {
            return Err(PushError::TooManyTokens(message.tokens.len()));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&Self::request_body(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail = detail.chars().take(256).collect();
            return Err(PushError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: FcmResponse = response.json().await?;
        tracing::debug!(
            success = parsed.success,
            failure = parsed.failure,
            batch_size = message.tokens.len(),
            "Multicast batch accepted"
        );

        Ok(MulticastOutcome {
            success_count: parsed.success,
            failure_count: parsed.failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let message = MulticastMessage::new(
            vec!["t1".to_string(), "t2".to_string()],
            "Pantry updated",
            "Ada added Milk to the pantry.",
        )
        .with_data("type", "householdUpdate")
        .with_data("itemName", "Milk");

        let body = FcmTransport::request_body(&message);

        assert_eq!(body["registration_ids"].as_array().unwrap().len(), 2);
        assert_eq!(body["notification"]["title"], "Pantry updated");
        assert_eq!(body["android"]["priority"], "high");
        assert_eq!(
            body["android"]["notification"]["channel_id"],
            ANDROID_CHANNEL_ID
        );
        assert_eq!(body["apns"]["payload"]["aps"]["badge"], 1);
        assert_eq!(body["apns"]["payload"]["aps"]["sound"], "default");
        assert_eq!(body["data"]["type"], "householdUpdate");
        assert_eq!(body["data"]["itemName"], "Milk");
    }

    #[tokio::test]
    async fn test_oversized_batch_is_rejected_locally() {
        let transport = FcmTransport::new("http://localhost:1", "test-key");
        let tokens = (0..FANOUT_LIMIT + 1).map(|i| format!("t{}", i)).collect();
        let message = MulticastMessage::new(tokens, "T", "B");

        let result = transport.send_multicast(&message).await;
        assert!(matches!(result, Err(PushError::TooManyTokens(501))));
    }
}
