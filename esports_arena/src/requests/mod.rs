//! Coin request queue and admin approval workflow.
//!
//! Users ask for wallet changes (top-ups, withdrawals, paid tournament
//! creation) by submitting a request; an admin later approves or rejects it.
//! Withdrawals and creation requests pre-debit the wallet at submission time
//! so a pending request cannot be double-spent, and a rejection refunds the
//! pre-debit with a compensating credit.
//!
//! A request resolves exactly once: `pending -> approved | rejected`. The
//! resolution writes the status change, any ledger entry, the tournament
//! publish, and the user notification in one database transaction.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{RequestError, RequestResult};
pub use manager::RequestManager;
pub use models::{
    CoinRequest, GooglePlayPackage, RequestDetails, RequestOutcome, RequestStatus, RequestType,
    WithdrawalTarget,
};
