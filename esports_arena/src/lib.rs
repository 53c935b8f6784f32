//! # eSports Arena
//!
//! Backend library for an eSports tournament platform: a points wallet with
//! an append-only transaction ledger, an admin-approved coin request queue,
//! a per-user notification store, and a tournament store with participation
//! and winner payout handling.
//!
//! ## Architecture
//!
//! Every store is backed by a single SQLite database accessed through sqlx.
//! Balances are never stored; they are folded from the ledger on read. The
//! approval workflow composes the stores inside one database transaction so
//! a request resolution either fully happens (status change, ledger entry,
//! notification, tournament publish) or not at all.
//!
//! ## Core modules
//!
//! - [`wallet`]: transaction ledger, derived balances, daily spin reward
//! - [`requests`]: coin request queue and the approval workflow
//! - [`notifications`]: per-user notification log
//! - [`tournament`]: tournament records, participation, winner payouts
//! - [`fees`]: centralized fee policy (GST, platform fee, creation surcharge)
//! - [`auth`]: identity model handed in by the external identity provider
//!
//! ## Example
//!
//! ```no_run
//! use esports_arena::db::{Database, DatabaseConfig};
//! use esports_arena::wallet::WalletManager;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::default()).await?;
//!     db.migrate().await?;
//!     let wallet = WalletManager::new(Arc::new(db.pool().clone()));
//!     let balance = wallet.balance("player@example.com").await?;
//!     println!("balance: {balance}");
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod db;
pub mod fees;
pub mod notifications;
pub mod requests;
pub mod tournament;
pub mod wallet;

pub use auth::{Identity, Role};
pub use db::{Database, DatabaseConfig};
