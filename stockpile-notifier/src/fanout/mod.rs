//! Notification fan-out
//!
//! Turns one household-scoped event into per-device deliveries:
//!
//! ```text
//! MembershipResolver ──> batch_tokens ──> PushDispatcher
//!   (member set to        (≤ 500 per       (all batches
//!    device tokens)        batch)           concurrently)
//! ```
//!
//! Each stage isolates failures: a member whose lookup fails is skipped, a
//! batch whose send fails is logged, and neither stops the rest of the
//! pipeline or the inbox write running alongside it.

pub mod batch;
pub mod dispatch;
pub mod membership;

pub use batch::batch_tokens;
pub use dispatch::PushDispatcher;
pub use membership::MembershipResolver;
