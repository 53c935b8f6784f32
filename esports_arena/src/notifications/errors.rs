//! Notification error types.

use thiserror::Error;

/// Notification errors
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Notification not found
    #[error("Notification {0} not found")]
    NotFound(i64),

    /// Notification belongs to another user
    #[error("Notification {0} does not belong to the caller")]
    Forbidden(i64),
}

impl NotificationError {
    /// Get a client-safe error message that doesn't leak sensitive information
    pub fn client_message(&self) -> String {
        match self {
            NotificationError::Database(_) => "Internal server error".to_string(),
            NotificationError::NotFound(_) => "Notification not found".to_string(),
            NotificationError::Forbidden(_) => "Forbidden".to_string(),
        }
    }
}

/// Result type for notification operations
pub type NotificationResult<T> = Result<T, NotificationError>;
