//! Domain models
//!
//! Typed records for everything the notifier reads or writes. Household,
//! user, and pantry item state are owned by the pantry-management flows and
//! are read-only here; the inbox is the only collection this worker appends
//! to.

pub mod food_item;
pub mod household;
pub mod notification;
pub mod user;

pub use food_item::FoodItem;
pub use household::Household;
pub use notification::{InboxRecord, NewInboxRecord, NotificationContent, NotificationKind};
pub use user::User;
