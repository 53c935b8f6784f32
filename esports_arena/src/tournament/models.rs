//! Tournament data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tournament lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    /// Published, match not started yet
    Upcoming,
    /// Match in progress
    Live,
    /// Winners declared
    Completed,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentStatus::Upcoming => write!(f, "upcoming"),
            TournamentStatus::Live => write!(f, "live"),
            TournamentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Match room credentials, set by the host shortly before start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetails {
    pub room_id: String,
    pub room_pass: String,
}

/// Fields a tournament is created from. Also embedded verbatim in paid
/// creation requests awaiting approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentDetails {
    pub title: String,
    pub game_name: String,
    pub entry_fee: i64,
    pub prize_pool: i64,
    pub host: String,
    pub rules: String,
    pub match_time: DateTime<Utc>,
    pub image_url: Option<String>,
}

/// Tournament record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: i64,
    pub title: String,
    pub game_name: String,
    pub entry_fee: i64,
    pub prize_pool: i64,
    pub host: String,
    pub rules: String,
    pub match_time: DateTime<Utc>,
    pub status: TournamentStatus,
    pub image_url: Option<String>,
    /// User who funded the tournament via a creation request, if any
    pub creator_id: Option<String>,
    pub room_details: Option<RoomDetails>,
    pub created_at: DateTime<Utc>,
}

/// Join record; at most one per (tournament, user) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub tournament_id: i64,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}

/// One declared winner with their payout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerEntry {
    pub user_id: String,
    /// Finishing position, 1-indexed
    pub position: i64,
    pub prize: i64,
}
