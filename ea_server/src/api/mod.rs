//! HTTP API for the esports arena platform.
//!
//! Provides the REST API for wallets, coin requests, notifications, and
//! tournaments.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework
//! - **Tower**: Middleware for CORS and request correlation
//! - **Header identity**: The caller identity arrives from the fronting
//!   identity provider via `x-user-id` / `x-user-role` headers
//!
//! # Endpoints Overview
//!
//! ```text
//! GET    /health                                 - Health check (public)
//! GET    /api/v1/tournaments                     - List tournaments (public)
//! GET    /api/v1/tournaments/{id}                - Get tournament (public)
//! GET    /api/v1/tournaments/{id}/results        - Declared winners (public)
//! GET    /api/v1/wallet/balance                  - Current balance
//! GET    /api/v1/wallet/transactions             - Ledger history
//! POST   /api/v1/wallet/spin                     - Claim the daily spin
//! GET    /api/v1/notifications                   - List notifications
//! GET    /api/v1/notifications/unread-count      - Unread badge count
//! POST   /api/v1/notifications/{id}/read         - Mark as read
//! POST   /api/v1/requests/topup                  - Submit top-up request
//! POST   /api/v1/requests/withdrawal             - Submit withdrawal request
//! POST   /api/v1/requests/tournament             - Submit creation request
//! GET    /api/v1/requests                        - List requests (admin)
//! GET    /api/v1/requests/{id}                   - Get a request
//! POST   /api/v1/requests/{id}/resolve           - Approve/reject (admin)
//! POST   /api/v1/tournaments                     - Create directly (admin)
//! DELETE /api/v1/tournaments/{id}                - Delete (admin)
//! POST   /api/v1/tournaments/{id}/join           - Join
//! GET    /api/v1/tournaments/{id}/participants   - Participants
//! PUT    /api/v1/tournaments/{id}/room           - Set room credentials (host)
//! POST   /api/v1/tournaments/{id}/winners        - Declare winners (host)
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod identity;
pub mod notifications;
pub mod request_id;
pub mod requests;
pub mod tournaments;
pub mod wallet;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
};
use esports_arena::{
    notifications::NotificationManager, requests::RequestManager, tournament::TournamentManager,
    wallet::WalletManager,
};
use serde::Serialize;
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request (cheap due to Arc wrappers).
#[derive(Clone)]
pub struct AppState {
    pub wallet: Arc<WalletManager>,
    pub notifications: Arc<NotificationManager>,
    pub requests: Arc<RequestManager>,
    pub tournaments: Arc<TournamentManager>,
    pub pool: Arc<SqlitePool>,
}

/// Error payload returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Status code plus client-safe error body
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Arguments
///
/// - `state`: Application state with managers
///
/// # Returns
///
/// Configured Axum router ready to serve requests
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router();

    let root_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(root_routes)
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create API v1 router with all versioned endpoints.
///
/// Versioning allows future API evolution (v2, v3, ...) while keeping
/// existing clients working.
fn create_v1_router() -> Router<AppState> {
    // Public routes (no identity required)
    let public_routes = Router::new()
        .route("/tournaments", get(tournaments::list_tournaments))
        .route(
            "/tournaments/{tournament_id}",
            get(tournaments::get_tournament),
        )
        .route(
            "/tournaments/{tournament_id}/results",
            get(tournaments::list_results),
        );

    // Routes requiring a caller identity
    let protected_routes = Router::new()
        .route("/wallet/balance", get(wallet::get_balance))
        .route("/wallet/transactions", get(wallet::list_transactions))
        .route("/wallet/spin", post(wallet::claim_daily_spin))
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route(
            "/notifications/{notification_id}/read",
            post(notifications::mark_read),
        )
        .route("/requests", get(requests::list_requests))
        .route("/requests/topup", post(requests::submit_topup))
        .route("/requests/withdrawal", post(requests::submit_withdrawal))
        .route(
            "/requests/tournament",
            post(requests::submit_tournament_creation),
        )
        .route("/requests/{request_id}", get(requests::get_request))
        .route(
            "/requests/{request_id}/resolve",
            post(requests::resolve_request),
        )
        .route("/tournaments", post(tournaments::create_tournament))
        .route(
            "/tournaments/{tournament_id}",
            delete(tournaments::delete_tournament),
        )
        .route(
            "/tournaments/{tournament_id}/join",
            post(tournaments::join_tournament),
        )
        .route(
            "/tournaments/{tournament_id}/participants",
            get(tournaments::list_participants),
        )
        .route(
            "/tournaments/{tournament_id}/room",
            put(tournaments::set_room_details),
        )
        .route(
            "/tournaments/{tournament_id}/winners",
            post(tournaments::declare_winners),
        )
        .layer(axum::middleware::from_fn(identity::identity_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Checks database connectivity and returns `200 OK` when healthy, or
/// `503 Service Unavailable` otherwise.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","database":true,"timestamp":"2026-08-30T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = sqlx::query("SELECT 1")
        .fetch_one(&*state.pool)
        .await
        .is_ok();

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
