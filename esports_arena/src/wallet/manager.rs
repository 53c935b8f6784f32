//! Wallet manager implementation over the append-only transaction ledger.

use super::{
    errors::{WalletError, WalletResult},
    models::{SPIN_PRIZES, SpinClaim, Transaction, TxDirection},
};
use crate::db::DbTransaction;
use chrono::{DateTime, Days, Utc};
use log::debug;
use rand::Rng;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use std::sync::Arc;

/// Wallet manager
#[derive(Clone)]
pub struct WalletManager {
    pool: Arc<SqlitePool>,
}

impl WalletManager {
    /// Create a new wallet manager
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Get the current balance for a user
    ///
    /// The balance is always derived from the ledger:
    /// `sum(credits) - sum(debits)`.
    ///
    /// # Arguments
    ///
    /// * `user_id` - User id (account email)
    ///
    /// # Returns
    ///
    /// * `WalletResult<i64>` - Current balance or error
    pub async fn balance(&self, user_id: &str) -> WalletResult<i64> {
        let balance = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(CASE WHEN direction = 'credit' THEN amount ELSE -amount END), 0)
             FROM transactions
             WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(balance)
    }

    /// Balance computed inside a caller-owned transaction, so a debit check
    /// and the debit itself observe the same ledger state.
    pub async fn balance_in_tx(
        &self,
        tx: &mut DbTransaction<'_>,
        user_id: &str,
    ) -> WalletResult<i64> {
        let balance = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(CASE WHEN direction = 'credit' THEN amount ELSE -amount END), 0)
             FROM transactions
             WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(balance)
    }

    /// Append a credit entry
    ///
    /// # Arguments
    ///
    /// * `user_id` - User id
    /// * `amount` - Points to credit (must be positive)
    /// * `description` - Human-readable ledger description
    /// * `request_id` - Coin request that caused this entry, if any
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidAmount` - Zero or negative amount
    pub async fn credit(
        &self,
        user_id: &str,
        amount: i64,
        description: &str,
        request_id: Option<i64>,
    ) -> WalletResult<Transaction> {
        let mut tx = self.pool.begin().await?;
        let entry = self
            .credit_in_tx(&mut tx, user_id, amount, description, request_id)
            .await?;
        tx.commit().await?;
        Ok(entry)
    }

    /// Append a debit entry, enforcing sufficient balance
    ///
    /// The balance check and the ledger insert happen in one database
    /// transaction so two concurrent debits cannot both pass the check.
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidAmount` - Zero or negative amount
    /// * `WalletError::InsufficientBalance` - Debit exceeds current balance
    pub async fn debit(
        &self,
        user_id: &str,
        amount: i64,
        description: &str,
        request_id: Option<i64>,
    ) -> WalletResult<Transaction> {
        let mut tx = self.pool.begin().await?;
        let entry = self
            .debit_in_tx(&mut tx, user_id, amount, description, request_id)
            .await?;
        tx.commit().await?;
        Ok(entry)
    }

    /// Credit variant composing into a caller-owned transaction
    pub async fn credit_in_tx(
        &self,
        tx: &mut DbTransaction<'_>,
        user_id: &str,
        amount: i64,
        description: &str,
        request_id: Option<i64>,
    ) -> WalletResult<Transaction> {
        self.insert_entry(tx, user_id, amount, TxDirection::Credit, description, request_id)
            .await
    }

    /// Debit variant composing into a caller-owned transaction
    pub async fn debit_in_tx(
        &self,
        tx: &mut DbTransaction<'_>,
        user_id: &str,
        amount: i64,
        description: &str,
        request_id: Option<i64>,
    ) -> WalletResult<Transaction> {
        if amount <= 0 {
            return Err(WalletError::InvalidAmount(amount));
        }

        let available = self.balance_in_tx(tx, user_id).await?;
        if available < amount {
            return Err(WalletError::InsufficientBalance {
                available,
                required: amount,
            });
        }

        self.insert_entry(tx, user_id, amount, TxDirection::Debit, description, request_id)
            .await
    }

    /// Get ledger entries for a user, newest first
    ///
    /// # Arguments
    ///
    /// * `user_id` - User id
    /// * `limit` - Maximum number of entries to return
    pub async fn transactions(&self, user_id: &str, limit: i64) -> WalletResult<Vec<Transaction>> {
        let rows = sqlx::query(
            "SELECT id, user_id, description, amount, direction, request_id, created_at
             FROM transactions
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(row_to_transaction).collect())
    }

    /// Claim the daily spin reward
    ///
    /// One free spin per UTC calendar day. The prize is drawn server-side
    /// from the wheel segments; a zero prize still consumes the day's spin.
    ///
    /// # Errors
    ///
    /// * `WalletError::SpinNotAvailable` - Already claimed today
    pub async fn claim_daily_spin(&self, user_id: &str) -> WalletResult<SpinClaim> {
        // Draw before touching the database; the RNG handle must not be
        // held across an await point.
        let prize = {
            let mut rng = rand::rng();
            SPIN_PRIZES[rng.random_range(0..SPIN_PRIZES.len())]
        };

        let mut tx = self.pool.begin().await?;

        let last_claim: Option<DateTime<Utc>> = sqlx::query_scalar(
            "SELECT next_claim_at FROM spin_claims
             WHERE user_id = ?
             ORDER BY claimed_at DESC, id DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let claimed_at = Utc::now();
        if let Some(next_claim_at) = last_claim
            && claimed_at < next_claim_at
        {
            return Err(WalletError::SpinNotAvailable(next_claim_at));
        }

        if prize > 0 {
            self.credit_in_tx(&mut tx, user_id, prize, "Daily Spin Prize", None)
                .await?;
        }

        let next_claim_at = next_utc_midnight(claimed_at);
        let id = sqlx::query(
            "INSERT INTO spin_claims (user_id, amount, claimed_at, next_claim_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(prize)
        .bind(claimed_at)
        .bind(next_claim_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        debug!("daily spin for {user_id}: won {prize} points");

        Ok(SpinClaim {
            id,
            user_id: user_id.to_string(),
            amount: prize,
            claimed_at,
            next_claim_at,
        })
    }

    async fn insert_entry(
        &self,
        tx: &mut DbTransaction<'_>,
        user_id: &str,
        amount: i64,
        direction: TxDirection,
        description: &str,
        request_id: Option<i64>,
    ) -> WalletResult<Transaction> {
        if amount <= 0 {
            return Err(WalletError::InvalidAmount(amount));
        }

        let created_at = Utc::now();
        let id = sqlx::query(
            "INSERT INTO transactions (user_id, description, amount, direction, request_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(description)
        .bind(amount)
        .bind(direction.to_string())
        .bind(request_id)
        .bind(created_at)
        .execute(&mut **tx)
        .await?
        .last_insert_rowid();

        Ok(Transaction {
            id,
            user_id: user_id.to_string(),
            description: description.to_string(),
            amount,
            direction,
            request_id,
            created_at,
        })
    }
}

fn row_to_transaction(row: SqliteRow) -> Transaction {
    Transaction {
        id: row.get("id"),
        user_id: row.get("user_id"),
        description: row.get("description"),
        amount: row.get("amount"),
        direction: match row.get::<String, _>("direction").as_str() {
            "debit" => TxDirection::Debit,
            _ => TxDirection::Credit,
        },
        request_id: row.get("request_id"),
        created_at: row.get("created_at"),
    }
}

/// Midnight UTC of the day after `now`; the moment the next free spin
/// becomes available.
fn next_utc_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    let next_day = now.date_naive() + Days::new(1);
    next_day
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
}
