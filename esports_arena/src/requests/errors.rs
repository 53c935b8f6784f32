//! Coin request error types.

use crate::fees::FeeError;
use crate::notifications::NotificationError;
use crate::tournament::TournamentError;
use crate::wallet::WalletError;
use thiserror::Error;

/// Coin request errors
#[derive(Debug, Error)]
pub enum RequestError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Wallet error (pre-debit, refund, approval credit)
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Fee policy error
    #[error(transparent)]
    Fee(#[from] FeeError),

    /// Notification write failed
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// Tournament publish failed
    #[error(transparent)]
    Tournament(#[from] TournamentError),

    /// Request not found
    #[error("Coin request {0} not found")]
    NotFound(i64),

    /// Request was resolved before; terminal transitions are one-shot
    #[error("Coin request {id} is already {status}")]
    AlreadyResolved {
        id: i64,
        status: crate::requests::RequestStatus,
    },

    /// Caller is not an admin
    #[error("Forbidden")]
    Forbidden,

    /// Malformed submission
    #[error("Invalid request: {0}")]
    Validation(String),
}

impl RequestError {
    /// Get a client-safe error message that doesn't leak sensitive information
    pub fn client_message(&self) -> String {
        match self {
            RequestError::Database(_) => "Internal server error".to_string(),
            RequestError::Wallet(e) => e.client_message(),
            RequestError::Notification(e) => e.client_message(),
            RequestError::Tournament(e) => e.client_message(),
            RequestError::NotFound(_) => "Coin request not found".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for coin request operations
pub type RequestResult<T> = Result<T, RequestError>;
