//! Coin request API handlers.
//!
//! Submission endpoints are available to every signed-in user; listing the
//! full queue and resolving requests are admin operations.
//!
//! # Examples
//!
//! Submit a withdrawal:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/requests/withdrawal \
//!   -H "x-user-id: player@example.com" \
//!   -H "Content-Type: application/json" \
//!   -d '{"amount": 1000, "target": {"method": "upi", "upi_id": "player@upi"}}'
//! ```
//!
//! Approve it:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/requests/1/resolve \
//!   -H "x-user-id: admin@example.com" -H "x-user-role: admin" \
//!   -H "Content-Type: application/json" \
//!   -d '{"outcome": "approved"}'
//! ```

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use esports_arena::auth::Identity;
use esports_arena::requests::{
    CoinRequest, RequestError, RequestOutcome, RequestStatus, WithdrawalTarget,
};
use esports_arena::tournament::{TournamentDetails, TournamentError};
use esports_arena::wallet::WalletError;
use serde::Deserialize;

use super::{ApiError, AppState, error};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct TopUpRequest {
    pub amount: i64,
    pub screenshot: Option<String>,
    pub redeem_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawalRequest {
    pub amount: i64,
    pub target: WithdrawalTarget,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub outcome: RequestOutcome,
    pub sent_redeem_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<RequestStatus>,
}

fn request_error(e: RequestError) -> ApiError {
    let status = match &e {
        RequestError::Database(_) | RequestError::Notification(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        RequestError::Wallet(WalletError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        RequestError::Wallet(_) | RequestError::Fee(_) | RequestError::Validation(_) => {
            StatusCode::BAD_REQUEST
        }
        RequestError::Tournament(TournamentError::Validation(_)) => StatusCode::BAD_REQUEST,
        RequestError::Tournament(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RequestError::NotFound(_) => StatusCode::NOT_FOUND,
        RequestError::AlreadyResolved { .. } => StatusCode::CONFLICT,
        RequestError::Forbidden => StatusCode::FORBIDDEN,
    };
    error(status, e.client_message())
}

/// Submit a top-up request.
///
/// No points move until an admin approves.
pub async fn submit_topup(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<TopUpRequest>,
) -> Result<(StatusCode, Json<CoinRequest>), ApiError> {
    let request = state
        .requests
        .submit_credit(
            &identity.user_id,
            body.amount,
            body.screenshot.as_deref(),
            body.redeem_code.as_deref(),
        )
        .await
        .map_err(request_error)?;

    metrics::coin_requests_submitted_total("credit");
    Ok((StatusCode::CREATED, Json(request)))
}

/// Submit a withdrawal request.
///
/// Fees are computed server-side and the gross amount is held immediately.
///
/// # Errors
///
/// - `400 Bad Request`: Insufficient balance or malformed payout target
pub async fn submit_withdrawal(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<WithdrawalRequest>,
) -> Result<(StatusCode, Json<CoinRequest>), ApiError> {
    let request = state
        .requests
        .submit_withdrawal(&identity.user_id, body.amount, &body.target)
        .await
        .map_err(request_error)?;

    metrics::coin_requests_submitted_total("debit");
    Ok((StatusCode::CREATED, Json(request)))
}

/// Submit a paid tournament creation request.
///
/// Holds the prize pool plus the creation service fee until an admin decides.
pub async fn submit_tournament_creation(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(details): Json<TournamentDetails>,
) -> Result<(StatusCode, Json<CoinRequest>), ApiError> {
    let request = state
        .requests
        .submit_tournament_creation(&identity.user_id, &details)
        .await
        .map_err(request_error)?;

    metrics::coin_requests_submitted_total("tournament_creation");
    Ok((StatusCode::CREATED, Json(request)))
}

/// List coin requests, newest first. Admin only.
///
/// # Query Parameters
///
/// - `status`: Optional filter (`pending`, `approved`, `rejected`)
pub async fn list_requests(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CoinRequest>>, ApiError> {
    if !identity.is_admin() {
        return Err(error(StatusCode::FORBIDDEN, "Forbidden"));
    }

    let list = state
        .requests
        .list(query.status)
        .await
        .map_err(request_error)?;

    Ok(Json(list))
}

/// Get a single request. Visible to its owner and to admins.
pub async fn get_request(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(request_id): Path<i64>,
) -> Result<Json<CoinRequest>, ApiError> {
    let request = state
        .requests
        .get(request_id)
        .await
        .map_err(request_error)?;

    if request.user_id != identity.user_id && !identity.is_admin() {
        return Err(error(StatusCode::FORBIDDEN, "Forbidden"));
    }

    Ok(Json(request))
}

/// Approve or reject a pending request. Admin only, one-shot.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Unknown request id
/// - `409 Conflict`: Request was resolved before
pub async fn resolve_request(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(request_id): Path<i64>,
    Json(body): Json<ResolveRequest>,
) -> Result<Json<CoinRequest>, ApiError> {
    let request = state
        .requests
        .resolve(
            request_id,
            body.outcome,
            body.sent_redeem_code.as_deref(),
            &identity,
        )
        .await
        .map_err(request_error)?;

    let outcome = match body.outcome {
        RequestOutcome::Approved => "approved",
        RequestOutcome::Rejected => "rejected",
    };
    metrics::coin_requests_resolved_total(outcome);
    Ok(Json(request))
}
