//! Tournament API handlers.
//!
//! Listing and reading tournaments is public; joining requires an identity,
//! and mutation endpoints are limited to admins or the tournament creator.
//!
//! # Examples
//!
//! Join a tournament:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/tournaments/1/join \
//!   -H "x-user-id: player@example.com"
//! ```

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use esports_arena::auth::Identity;
use esports_arena::tournament::{
    Participant, RoomDetails, Tournament, TournamentDetails, TournamentError, WinnerEntry,
};
use esports_arena::wallet::WalletError;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiError, AppState, error};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct DeclareWinnersRequest {
    pub winners: Vec<WinnerEntry>,
}

fn tournament_error(e: TournamentError) -> ApiError {
    let status = match &e {
        TournamentError::Database(_) | TournamentError::Notification(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        TournamentError::Wallet(WalletError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        TournamentError::Wallet(_)
        | TournamentError::PrizePoolExceeded { .. }
        | TournamentError::NotParticipant(_)
        | TournamentError::Validation(_) => StatusCode::BAD_REQUEST,
        TournamentError::NotFound(_) => StatusCode::NOT_FOUND,
        TournamentError::Forbidden => StatusCode::FORBIDDEN,
        TournamentError::AlreadyCompleted(_) => StatusCode::CONFLICT,
    };
    error(status, e.client_message())
}

/// List all tournaments, newest first. Public.
pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Tournament>>, ApiError> {
    let list = state.tournaments.list().await.map_err(tournament_error)?;
    Ok(Json(list))
}

/// Get a tournament by id. Public.
pub async fn get_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<Tournament>, ApiError> {
    let tournament = state
        .tournaments
        .get(tournament_id)
        .await
        .map_err(tournament_error)?;
    Ok(Json(tournament))
}

/// Declared winners for a tournament, ordered by position. Public.
pub async fn list_results(
    State(state): State<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<Vec<WinnerEntry>>, ApiError> {
    // 404 for unknown ids rather than an empty list.
    state
        .tournaments
        .get(tournament_id)
        .await
        .map_err(tournament_error)?;

    let results = state
        .tournaments
        .results(tournament_id)
        .await
        .map_err(tournament_error)?;
    Ok(Json(results))
}

/// Create and publish a tournament directly. Admin only.
pub async fn create_tournament(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(details): Json<TournamentDetails>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    let tournament = state
        .tournaments
        .create(&details, &identity)
        .await
        .map_err(tournament_error)?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// Delete a tournament. Admin only.
pub async fn delete_tournament(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state
        .tournaments
        .delete(tournament_id, &identity)
        .await
        .map_err(tournament_error)?;
    Ok(Json(json!({ "id": tournament_id, "deleted": true })))
}

/// Join a tournament.
///
/// Idempotent: re-joining returns `200 OK` without creating a duplicate
/// participant row.
pub async fn join_tournament(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<Participant>, ApiError> {
    let participant = state
        .tournaments
        .join(tournament_id, &identity.user_id)
        .await
        .map_err(tournament_error)?;

    metrics::tournament_joins_total();
    Ok(Json(participant))
}

/// List participants of a tournament.
pub async fn list_participants(
    State(state): State<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<Vec<Participant>>, ApiError> {
    state
        .tournaments
        .get(tournament_id)
        .await
        .map_err(tournament_error)?;

    let participants = state
        .tournaments
        .participants(tournament_id)
        .await
        .map_err(tournament_error)?;
    Ok(Json(participants))
}

/// Set the match room credentials. Admin or tournament creator only.
pub async fn set_room_details(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(tournament_id): Path<i64>,
    Json(room): Json<RoomDetails>,
) -> Result<Json<Tournament>, ApiError> {
    let tournament = state
        .tournaments
        .set_room_details(tournament_id, &room, &identity)
        .await
        .map_err(tournament_error)?;
    Ok(Json(tournament))
}

/// Declare winners and pay out prizes. Admin or tournament creator only.
///
/// # Errors
///
/// - `400 Bad Request`: Prizes exceed the pool, or a winner never joined
/// - `409 Conflict`: Winners were declared before
pub async fn declare_winners(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(tournament_id): Path<i64>,
    Json(body): Json<DeclareWinnersRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .tournaments
        .declare_winners(tournament_id, &body.winners, &identity)
        .await
        .map_err(tournament_error)?;

    Ok(Json(json!({
        "tournament_id": tournament_id,
        "winners": body.winners.len(),
        "status": "completed",
    })))
}
