//! Tournament error types.

use crate::notifications::NotificationError;
use crate::wallet::WalletError;
use thiserror::Error;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Wallet error during winner payout
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Notification write failed
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// Tournament not found
    #[error("Tournament {0} not found")]
    NotFound(i64),

    /// Caller is neither an admin nor the tournament creator
    #[error("Forbidden")]
    Forbidden,

    /// Winners already declared
    #[error("Tournament {0} is already completed")]
    AlreadyCompleted(i64),

    /// Declared prizes exceed the prize pool
    #[error("Declared prizes ({declared}) exceed the prize pool ({pool})")]
    PrizePoolExceeded { pool: i64, declared: i64 },

    /// A declared winner never joined the tournament
    #[error("User {0} is not a participant")]
    NotParticipant(String),

    /// Malformed creation details or winner list
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl TournamentError {
    /// Get a client-safe error message that doesn't leak sensitive information
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::Database(_) => "Internal server error".to_string(),
            TournamentError::Wallet(e) => e.client_message(),
            TournamentError::Notification(e) => e.client_message(),
            _ => self.to_string(),
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;
