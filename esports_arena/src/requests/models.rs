//! Coin request data models.

use crate::fees::WithdrawalBreakdown;
use crate::tournament::TournamentDetails;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of wallet change a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// Top-up: user paid externally and wants points credited
    Credit,
    /// Withdrawal: user wants points paid out via UPI or Google Play
    Debit,
    /// User funds a tournament of their own (prize pool + service fee)
    TournamentCreation,
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestType::Credit => write!(f, "credit"),
            RequestType::Debit => write!(f, "debit"),
            RequestType::TournamentCreation => write!(f, "tournament_creation"),
        }
    }
}

/// Request lifecycle state. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Approved => write!(f, "approved"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Admin decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestOutcome {
    Approved,
    Rejected,
}

/// Google Play product a withdrawal is redeemed against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GooglePlayPackage {
    pub name: String,
    pub coins: i64,
}

/// Where an approved withdrawal gets paid out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum WithdrawalTarget {
    Upi { upi_id: String },
    GooglePlay { package: GooglePlayPackage },
}

/// Optional per-type payload carried by a request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestDetails {
    /// Payment screenshot filename (top-ups; file storage is external)
    pub screenshot: Option<String>,
    /// Redeem code supplied by the user (top-ups)
    pub redeem_code: Option<String>,
    /// UPI payout address (withdrawals)
    pub upi_id: Option<String>,
    /// Google Play payout package (withdrawals)
    pub google_play_package: Option<GooglePlayPackage>,
    /// Server-computed fee breakdown (withdrawals)
    pub fee_breakdown: Option<WithdrawalBreakdown>,
    /// Tournament to publish on approval (creation requests)
    pub tournament_details: Option<TournamentDetails>,
    /// Redeem code the admin sent back on approval (Google Play payouts)
    pub sent_redeem_code: Option<String>,
}

/// A user-initiated ask for a wallet change requiring admin approval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinRequest {
    pub id: i64,
    pub user_id: String,
    pub request_type: RequestType,
    /// Points at stake: the credit amount, the gross withdrawal amount, or
    /// the full creation total (prize pool + service fee)
    pub amount: i64,
    pub status: RequestStatus,
    pub details: RequestDetails,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}
