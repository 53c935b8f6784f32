//! Wallet API handlers.
//!
//! Balance and history are always derived from the transaction ledger; there
//! is no stored balance to read or update.
//!
//! # Examples
//!
//! Get the current balance:
//! ```bash
//! curl http://localhost:8080/api/v1/wallet/balance \
//!   -H "x-user-id: player@example.com"
//! ```

use axum::{
    Json,
    extract::{Extension, Query, State},
    http::StatusCode,
};
use esports_arena::auth::Identity;
use esports_arena::wallet::{SpinClaim, Transaction, WalletError};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState, error};
use crate::metrics;

const DEFAULT_HISTORY_LIMIT: i64 = 50;

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub user_id: String,
    pub balance: i64,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

fn wallet_error(e: WalletError) -> ApiError {
    let status = match &e {
        WalletError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        WalletError::InsufficientBalance { .. } | WalletError::InvalidAmount(_) => {
            StatusCode::BAD_REQUEST
        }
        WalletError::SpinNotAvailable(_) => StatusCode::TOO_MANY_REQUESTS,
    };
    error(status, e.client_message())
}

/// Get the caller's current balance.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing identity headers
/// - `500 Internal Server Error`: Database error
pub async fn get_balance(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state
        .wallet
        .balance(&identity.user_id)
        .await
        .map_err(wallet_error)?;

    Ok(Json(BalanceResponse {
        user_id: identity.user_id,
        balance,
    }))
}

/// Get the caller's ledger history, newest first.
///
/// # Query Parameters
///
/// - `limit`: Maximum entries to return (default 50)
pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 500);
    let history = state
        .wallet
        .transactions(&identity.user_id, limit)
        .await
        .map_err(wallet_error)?;

    Ok(Json(history))
}

/// Claim the daily spin reward.
///
/// The prize is drawn server-side from the wheel segments; one free spin per
/// UTC calendar day.
///
/// # Errors
///
/// - `429 Too Many Requests`: Already claimed today
pub async fn claim_daily_spin(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<SpinClaim>, ApiError> {
    let claim = state
        .wallet
        .claim_daily_spin(&identity.user_id)
        .await
        .map_err(wallet_error)?;

    metrics::daily_spins_total();
    Ok(Json(claim))
}
