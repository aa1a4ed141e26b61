//! # Stockpile Notifier Library
//!
//! Core notification fan-out engine for the Stockpile pantry backend.
//!
//! ## Modules
//!
//! - `transport`: Multicast push transport trait, FCM client, and mock
//! - `fanout`: Membership resolution, token batching, push dispatch
//! - `inbox`: Durable per-household inbox writer
//! - `actor`: Acting-user display-name resolution
//! - `handlers`: One handler per triggering condition
//! - `changefeed`: Redis Stream consumer for pantry item changes
//! - `scheduler`: Daily UTC scan jobs
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use stockpile_notifier::handlers::NotificationEngine;
//! use stockpile_notifier::transport::MockTransport;
//! use stockpile_shared::store::MemoryStore;
//!
//! # async fn example() {
//! let store = Arc::new(MemoryStore::new());
//! let transport = Arc::new(MockTransport::new());
//! let engine = NotificationEngine::new(store, transport);
//! engine.expiry_scan(chrono::Utc::now()).await.ok();
//! # }
//! ```

pub mod actor;
pub mod changefeed;
pub mod fanout;
pub mod handlers;
pub mod inbox;
pub mod scheduler;
pub mod transport;
