//! Coin request manager: submission queue and the approval workflow.

use super::{
    errors::{RequestError, RequestResult},
    models::{
        CoinRequest, GooglePlayPackage, RequestDetails, RequestOutcome, RequestStatus, RequestType,
        WithdrawalTarget,
    },
};
use crate::auth::Identity;
use crate::db::DbTransaction;
use crate::fees::{self, WithdrawalBreakdown};
use crate::notifications::NotificationManager;
use crate::tournament::{TournamentDetails, TournamentManager, manager::validate_details};
use crate::wallet::WalletManager;
use chrono::Utc;
use log::info;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use std::sync::Arc;

/// Coin request manager
#[derive(Clone)]
pub struct RequestManager {
    pool: Arc<SqlitePool>,
    wallet: Arc<WalletManager>,
    notifications: Arc<NotificationManager>,
    tournaments: Arc<TournamentManager>,
}

impl RequestManager {
    /// Create a new request manager
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `wallet` - Wallet manager for pre-debits, refunds, and approval credits
    /// * `notifications` - Notification manager for status messages
    /// * `tournaments` - Tournament manager for publishing approved creations
    pub fn new(
        pool: Arc<SqlitePool>,
        wallet: Arc<WalletManager>,
        notifications: Arc<NotificationManager>,
        tournaments: Arc<TournamentManager>,
    ) -> Self {
        Self {
            pool,
            wallet,
            notifications,
            tournaments,
        }
    }

    /// Submit a top-up request.
    ///
    /// No ledger effect; points are only credited if an admin approves.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Requesting user
    /// * `amount` - Points asked for (must be positive)
    /// * `screenshot` - Payment screenshot filename, if any
    /// * `redeem_code` - Redeem code the user paid with, if any
    pub async fn submit_credit(
        &self,
        user_id: &str,
        amount: i64,
        screenshot: Option<&str>,
        redeem_code: Option<&str>,
    ) -> RequestResult<CoinRequest> {
        validate_user_id(user_id)?;
        if amount <= 0 {
            return Err(RequestError::Validation(format!(
                "amount must be positive, got {amount}"
            )));
        }

        let details = RequestDetails {
            screenshot: screenshot.map(str::to_string),
            redeem_code: redeem_code.map(str::to_string),
            ..Default::default()
        };

        let mut tx = self.pool.begin().await?;
        let id = self
            .insert_request(&mut tx, user_id, RequestType::Credit, amount, &details)
            .await?;
        tx.commit().await?;

        info!("coin request {id}: credit of {amount} for {user_id}");
        self.get(id).await
    }

    /// Submit a withdrawal request.
    ///
    /// The fee breakdown is computed server-side and the full gross amount
    /// is pre-debited in the same transaction that stores the request, so a
    /// pending withdrawal cannot be double-spent.
    ///
    /// # Errors
    ///
    /// * `RequestError::Wallet(InsufficientBalance)` - Gross amount exceeds balance
    /// * `RequestError::Validation` - Malformed payout target
    pub async fn submit_withdrawal(
        &self,
        user_id: &str,
        amount: i64,
        target: &WithdrawalTarget,
    ) -> RequestResult<CoinRequest> {
        validate_user_id(user_id)?;
        validate_target(target)?;
        let breakdown = fees::withdrawal_breakdown(amount)?;

        let (upi_id, google_play_package) = match target {
            WithdrawalTarget::Upi { upi_id } => (Some(upi_id.clone()), None),
            WithdrawalTarget::GooglePlay { package } => (None, Some(package.clone())),
        };
        let details = RequestDetails {
            upi_id,
            google_play_package,
            fee_breakdown: Some(breakdown),
            ..Default::default()
        };

        let mut tx = self.pool.begin().await?;
        let id = self
            .insert_request(&mut tx, user_id, RequestType::Debit, amount, &details)
            .await?;
        // Pessimistic pre-debit; rolled back with the request row if the
        // balance check fails.
        self.wallet
            .debit_in_tx(
                &mut tx,
                user_id,
                amount,
                "Withdrawal request (pending approval)",
                Some(id),
            )
            .await?;
        tx.commit().await?;

        info!("coin request {id}: withdrawal of {amount} for {user_id}");
        self.get(id).await
    }

    /// Submit a paid tournament creation request.
    ///
    /// Pre-debits the full prize pool plus the creation service fee; the
    /// tournament is only published when an admin approves.
    pub async fn submit_tournament_creation(
        &self,
        user_id: &str,
        tournament: &TournamentDetails,
    ) -> RequestResult<CoinRequest> {
        validate_user_id(user_id)?;
        // Same checks the publish step runs; a request that can never be
        // approved must not take a hold on the wallet.
        validate_details(tournament)?;
        let total = fees::creation_total(tournament.prize_pool)?;

        let details = RequestDetails {
            tournament_details: Some(tournament.clone()),
            ..Default::default()
        };

        let mut tx = self.pool.begin().await?;
        let id = self
            .insert_request(
                &mut tx,
                user_id,
                RequestType::TournamentCreation,
                total,
                &details,
            )
            .await?;
        self.wallet
            .debit_in_tx(
                &mut tx,
                user_id,
                total,
                "Tournament creation funding (pending approval)",
                Some(id),
            )
            .await?;
        tx.commit().await?;

        info!("coin request {id}: tournament creation ({total}) for {user_id}");
        self.get(id).await
    }

    /// Get a request by id
    pub async fn get(&self, id: i64) -> RequestResult<CoinRequest> {
        let row = sqlx::query(SELECT_REQUEST)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(RequestError::NotFound(id))?;
        Ok(row_to_request(row))
    }

    /// List requests, newest first, optionally filtered by status
    pub async fn list(&self, status: Option<RequestStatus>) -> RequestResult<Vec<CoinRequest>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "SELECT * FROM coin_requests WHERE status = ? ORDER BY created_at DESC, id DESC",
                )
                .bind(status.to_string())
                .fetch_all(self.pool.as_ref())
                .await?
            }
            None => {
                sqlx::query("SELECT * FROM coin_requests ORDER BY created_at DESC, id DESC")
                    .fetch_all(self.pool.as_ref())
                    .await?
            }
        };
        Ok(rows.into_iter().map(row_to_request).collect())
    }

    /// List requests awaiting admin action
    pub async fn list_pending(&self) -> RequestResult<Vec<CoinRequest>> {
        self.list(Some(RequestStatus::Pending)).await
    }

    /// Resolve a pending request. Admin only, one-shot.
    ///
    /// All effects commit in a single database transaction: the status
    /// change, any ledger entry (approval credit or rejection refund), the
    /// tournament publish for approved creations, and the user notification.
    ///
    /// # Arguments
    ///
    /// * `id` - Request id
    /// * `outcome` - Admin decision
    /// * `sent_redeem_code` - Redeem code sent to the user, for approved
    ///   Google Play payouts
    /// * `resolver` - Acting identity; must be an admin
    ///
    /// # Errors
    ///
    /// * `RequestError::Forbidden` - Resolver is not an admin
    /// * `RequestError::NotFound` - Unknown request id
    /// * `RequestError::AlreadyResolved` - Request left `pending` before
    pub async fn resolve(
        &self,
        id: i64,
        outcome: RequestOutcome,
        sent_redeem_code: Option<&str>,
        resolver: &Identity,
    ) -> RequestResult<CoinRequest> {
        resolver
            .require_admin()
            .map_err(|_| RequestError::Forbidden)?;

        let mut tx = self.pool.begin().await?;

        let request = sqlx::query(SELECT_REQUEST)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .map(row_to_request)
            .ok_or(RequestError::NotFound(id))?;

        if request.status != RequestStatus::Pending {
            return Err(RequestError::AlreadyResolved {
                id,
                status: request.status,
            });
        }

        let message = match (request.request_type, outcome) {
            (RequestType::Credit, RequestOutcome::Approved) => {
                self.wallet
                    .credit_in_tx(
                        &mut tx,
                        &request.user_id,
                        request.amount,
                        "Coin top-up approved",
                        Some(id),
                    )
                    .await?;
                format!(
                    "Your top-up request for {} points has been approved.",
                    request.amount
                )
            }
            (RequestType::Credit, RequestOutcome::Rejected) => {
                // Nothing was debited at submission; nothing to compensate.
                format!(
                    "Your top-up request for {} points has been rejected.",
                    request.amount
                )
            }
            (RequestType::Debit, RequestOutcome::Approved) => {
                // The pre-debit recorded at submission time stands.
                let paid_out = request
                    .details
                    .fee_breakdown
                    .as_ref()
                    .map_or(request.amount, |b| b.net);
                format!(
                    "Your withdrawal request has been approved. {paid_out} points are being paid out."
                )
            }
            (RequestType::Debit, RequestOutcome::Rejected) => {
                self.wallet
                    .credit_in_tx(
                        &mut tx,
                        &request.user_id,
                        request.amount,
                        "Refund: withdrawal request rejected",
                        Some(id),
                    )
                    .await?;
                format!(
                    "Your withdrawal request has been rejected. {} points have been refunded to your wallet.",
                    request.amount
                )
            }
            (RequestType::TournamentCreation, RequestOutcome::Approved) => {
                let details = request.details.tournament_details.as_ref().ok_or_else(|| {
                    RequestError::Validation(
                        "creation request is missing tournament details".into(),
                    )
                })?;
                self.tournaments
                    .publish_in_tx(&mut tx, details, Some(&request.user_id))
                    .await?;
                format!(
                    "Your tournament \"{}\" has been approved and is now live!",
                    details.title
                )
            }
            (RequestType::TournamentCreation, RequestOutcome::Rejected) => {
                self.wallet
                    .credit_in_tx(
                        &mut tx,
                        &request.user_id,
                        request.amount,
                        "Refund: tournament creation rejected",
                        Some(id),
                    )
                    .await?;
                format!(
                    "Your tournament creation request has been rejected. {} points have been refunded to your wallet.",
                    request.amount
                )
            }
        };

        let status = match outcome {
            RequestOutcome::Approved => RequestStatus::Approved,
            RequestOutcome::Rejected => RequestStatus::Rejected,
        };
        sqlx::query(
            "UPDATE coin_requests
             SET status = ?, resolved_at = ?, sent_redeem_code = COALESCE(?, sent_redeem_code)
             WHERE id = ?",
        )
        .bind(status.to_string())
        .bind(Utc::now())
        .bind(sent_redeem_code)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        self.notifications
            .notify_in_tx(&mut tx, &request.user_id, &message, Some("/wallet"))
            .await?;

        tx.commit().await?;

        info!("coin request {id} resolved: {status}");
        self.get(id).await
    }

    async fn insert_request(
        &self,
        tx: &mut DbTransaction<'_>,
        user_id: &str,
        request_type: RequestType,
        amount: i64,
        details: &RequestDetails,
    ) -> RequestResult<i64> {
        let google_play_json = details
            .google_play_package
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RequestError::Validation(e.to_string()))?;
        let tournament_json = details
            .tournament_details
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RequestError::Validation(e.to_string()))?;
        let breakdown = details.fee_breakdown;

        let id = sqlx::query(
            "INSERT INTO coin_requests
                 (user_id, request_type, amount, status, screenshot, redeem_code, upi_id,
                  google_play_package, tournament_details, gst, platform_fee, final_amount,
                  created_at)
             VALUES (?, ?, ?, 'pending', ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(request_type.to_string())
        .bind(amount)
        .bind(&details.screenshot)
        .bind(&details.redeem_code)
        .bind(&details.upi_id)
        .bind(google_play_json)
        .bind(tournament_json)
        .bind(breakdown.map(|b| b.gst))
        .bind(breakdown.map(|b| b.platform_fee))
        .bind(breakdown.map(|b| b.net))
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?
        .last_insert_rowid();

        Ok(id)
    }
}

const SELECT_REQUEST: &str = "SELECT * FROM coin_requests WHERE id = ?";

fn validate_user_id(user_id: &str) -> RequestResult<()> {
    if user_id.contains('@') && !user_id.contains(char::is_whitespace) {
        Ok(())
    } else {
        Err(RequestError::Validation(format!(
            "malformed user id: {user_id}"
        )))
    }
}

fn validate_target(target: &WithdrawalTarget) -> RequestResult<()> {
    match target {
        WithdrawalTarget::Upi { upi_id } => {
            if !upi_id.contains('@') || upi_id.contains(char::is_whitespace) {
                return Err(RequestError::Validation(format!(
                    "malformed UPI id: {upi_id}"
                )));
            }
        }
        WithdrawalTarget::GooglePlay { package } => {
            if package.name.trim().is_empty() {
                return Err(RequestError::Validation(
                    "Google Play package name must not be empty".into(),
                ));
            }
            if package.coins <= 0 {
                return Err(RequestError::Validation(
                    "Google Play package coins must be positive".into(),
                ));
            }
        }
    }
    Ok(())
}

fn row_to_request(row: SqliteRow) -> CoinRequest {
    let amount: i64 = row.get("amount");
    let gst: Option<i64> = row.get("gst");
    let platform_fee: Option<i64> = row.get("platform_fee");
    let net: Option<i64> = row.get("final_amount");
    let fee_breakdown = match (gst, platform_fee, net) {
        (Some(gst), Some(platform_fee), Some(net)) => Some(WithdrawalBreakdown {
            gross: amount,
            gst,
            platform_fee,
            net,
        }),
        _ => None,
    };

    let google_play_package: Option<GooglePlayPackage> = row
        .get::<Option<String>, _>("google_play_package")
        .and_then(|s| serde_json::from_str(&s).ok());
    let tournament_details: Option<TournamentDetails> = row
        .get::<Option<String>, _>("tournament_details")
        .and_then(|s| serde_json::from_str(&s).ok());

    CoinRequest {
        id: row.get("id"),
        user_id: row.get("user_id"),
        request_type: match row.get::<String, _>("request_type").as_str() {
            "debit" => RequestType::Debit,
            "tournament_creation" => RequestType::TournamentCreation,
            _ => RequestType::Credit,
        },
        amount,
        status: match row.get::<String, _>("status").as_str() {
            "approved" => RequestStatus::Approved,
            "rejected" => RequestStatus::Rejected,
            _ => RequestStatus::Pending,
        },
        details: RequestDetails {
            screenshot: row.get("screenshot"),
            redeem_code: row.get("redeem_code"),
            upi_id: row.get("upi_id"),
            google_play_package,
            fee_breakdown,
            tournament_details,
            sent_redeem_code: row.get("sent_redeem_code"),
        },
        created_at: row.get("created_at"),
        resolved_at: row.get("resolved_at"),
    }
}
