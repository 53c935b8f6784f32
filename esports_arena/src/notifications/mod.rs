//! Notification store.
//!
//! Append-only per-user message log written by the approval workflow and
//! tournament events. Notifications are never deleted; the owning user can
//! only mark them read.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{NotificationError, NotificationResult};
pub use manager::NotificationManager;
pub use models::Notification;
