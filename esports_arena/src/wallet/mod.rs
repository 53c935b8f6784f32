//! Wallet module providing the points ledger with derived balances.
//!
//! This module implements:
//! - Append-only transaction ledger (credits and debits, amounts > 0)
//! - Balances folded from the ledger on read, never stored
//! - Server-side insufficient-balance enforcement for debits
//! - Daily spin reward with a per-calendar-day cooldown
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
//!
//!     wallet
//!         .credit("player@example.com", 500, "Welcome bonus", None)
//!         .await?;
//!     println!("balance: {}", wallet.balance("player@example.com").await?);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{WalletError, WalletResult};
pub use manager::WalletManager;
pub use models::{SPIN_PRIZES, SpinClaim, Transaction, TxDirection};
