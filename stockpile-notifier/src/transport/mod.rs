//! Multicast push transport
//!
//! This module defines the contract the dispatcher sends through. The
//! transport is an external collaborator: one call addresses up to
//! [`FANOUT_LIMIT`] device tokens, and callers must pre-batch anything
//! larger. Delivery is best-effort; a per-call outcome reports how many
//! tokens the provider accepted.
//!
//! # Payload shaping
//!
//! Every message carries fixed per-platform options:
//! - Android: priority `high`, notification channel [`ANDROID_CHANNEL_ID`],
//!   default sound
//! - APNs: default sound, badge-count increment of 1
//!
//! Custom data values are always strings; the provider rejects anything
//! else.
//!
//! # Example
//!
//! ```no_run
//! use stockpile_notifier::transport::{MulticastMessage, PushTransport, MockTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = MockTransport::new();
//! let message = MulticastMessage::new(
//!     vec!["token-1".to_string()],
//!     "Pantry updated",
//!     "Ada added Milk to the pantry.",
//! );
//! let outcome = transport.send_multicast(&message).await?;
//! println!("accepted: {}", outcome.success_count);
//! # Ok(())
//! # }
//! ```

pub mod fcm;
pub mod mock;

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

pub use fcm::FcmTransport;
pub use mock::MockTransport;

/// Hard provider limit on tokens per multicast call
pub const FANOUT_LIMIT: usize = 500;

/// Android notification channel all pantry notifications land in
pub const ANDROID_CHANNEL_ID: &str = "stockpile_pantry";

/// Push transport error types
#[derive(Debug, Error)]
pub enum PushError {
    /// Batch exceeds the provider fanout limit
    #[error("Multicast called with {0} tokens, limit is {FANOUT_LIMIT}")]
    TooManyTokens(usize),

    /// HTTP transport failure
    #[error("Push request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider rejected the call
    #[error("Push provider rejected the call: status {status}: {detail}")]
    Rejected {
        /// HTTP status returned by the provider
        status: u16,
        /// Response body, truncated
        detail: String,
    },

    /// Scripted failure (mock transport, test only)
    #[error("Injected push failure: {0}")]
    Injected(String),
}

/// Push result type alias
pub type PushResult<T> = Result<T, PushError>;

/// One multicast send: a token batch plus the shaped notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulticastMessage {
    /// Target device tokens, at most [`FANOUT_LIMIT`]
    pub tokens: Vec<String>,

    /// Notification title
    pub title: String,

    /// Notification body
    pub body: String,

    /// Custom data payload; values are always strings
    pub data: BTreeMap<String, String>,
}

impl MulticastMessage {
    /// Creates a message with an empty data payload
    pub fn new(tokens: Vec<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        MulticastMessage {
            tokens,
            title: title.into(),
            body: body.into(),
            data: BTreeMap::new(),
        }
    }

    /// Adds a custom data entry
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Per-call delivery outcome
///
/// Push delivery is best-effort; individual token failures inside an
/// accepted call are not retried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MulticastOutcome {
    /// Tokens the provider accepted
    pub success_count: usize,

    /// Tokens the provider reported as failed
    pub failure_count: usize,
}

/// Multicast push transport
///
/// Implementations must reject batches above [`FANOUT_LIMIT`] rather than
/// silently truncating them.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Sends one multicast call
    ///
    /// # Errors
    ///
    /// Returns an error when the whole call fails (oversized batch,
    /// connectivity, provider rejection). Partial token failures are
    /// reported in the outcome, not as an error.
    async fn send_multicast(&self, message: &MulticastMessage) -> PushResult<MulticastOutcome>;
}
