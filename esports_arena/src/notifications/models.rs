//! Notification data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: String,
    pub message: String,
    /// Optional in-app link target (e.g. a tournament page)
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
