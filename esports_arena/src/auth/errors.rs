//! Identity error types.

use thiserror::Error;

/// Identity errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Caller lacks the required role
    #[error("Forbidden")]
    Forbidden,

    /// Role string from the identity provider was not recognized
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Result type for identity checks
pub type AuthResult<T> = Result<T, AuthError>;
