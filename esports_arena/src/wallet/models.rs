//! Wallet data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prize segments of the daily spin wheel, in points. A zero segment means
/// no prize for that spin.
pub const SPIN_PRIZES: [i64; 8] = [100, 500, 1000, 20, 5000, 0, 200, 10];

/// Ledger entry direction. Direction is always encoded here, never by the
/// sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxDirection {
    Credit,
    Debit,
}

impl std::fmt::Display for TxDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxDirection::Credit => write!(f, "credit"),
            TxDirection::Debit => write!(f, "debit"),
        }
    }
}

/// Immutable ledger entry. `amount` is always strictly positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    pub description: String,
    pub amount: i64,
    pub direction: TxDirection,
    /// Coin request this entry originated from, if any
    pub request_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Daily spin claim record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinClaim {
    pub id: i64,
    pub user_id: String,
    /// Prize won; zero when the wheel landed on an empty segment
    pub amount: i64,
    pub claimed_at: DateTime<Utc>,
    pub next_claim_at: DateTime<Utc>,
}
