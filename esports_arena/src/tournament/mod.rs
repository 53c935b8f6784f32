//! Tournament store with participation and winner payouts.
//!
//! Tournaments are created directly by admins, or published by the approval
//! workflow when a paid creation request is approved. Joining is idempotent;
//! winner declaration validates prize totals server-side and pays winners
//! through the wallet ledger in a single database transaction.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{TournamentError, TournamentResult};
pub use manager::TournamentManager;
pub use models::{
    Participant, RoomDetails, Tournament, TournamentDetails, TournamentStatus, WinnerEntry,
};
