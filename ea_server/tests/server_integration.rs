//! Integration tests for the HTTP API.
//!
//! Drives the full router with in-process requests via `tower::ServiceExt`,
//! backed by an in-memory database.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use esports_arena::db::{Database, DatabaseConfig};
use esports_arena::notifications::NotificationManager;
use esports_arena::requests::RequestManager;
use esports_arena::tournament::TournamentManager;
use esports_arena::wallet::WalletManager;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

/// Helper to build the app router over a fresh in-memory database
async fn create_test_server() -> Router {
    let config = DatabaseConfig::in_memory();
    let db = Database::new(&config)
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Migration failed");
    let pool = Arc::new(db.pool().clone());

    let wallet = Arc::new(WalletManager::new(pool.clone()));
    let notifications = Arc::new(NotificationManager::new(pool.clone()));
    let tournaments = Arc::new(TournamentManager::new(
        pool.clone(),
        wallet.clone(),
        notifications.clone(),
    ));
    let requests = Arc::new(RequestManager::new(
        pool.clone(),
        wallet.clone(),
        notifications.clone(),
        tournaments.clone(),
    ));

    let state = ea_server::api::AppState {
        wallet,
        notifications,
        requests,
        tournaments,
        pool,
    };

    ea_server::api::create_router(state)
}

fn get(uri: &str, user: Option<(&str, &str)>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some((user_id, role)) = user {
        builder = builder.header("x-user-id", user_id).header("x-user-role", role);
    }
    builder.body(Body::empty()).unwrap()
}

fn send(method: &str, uri: &str, user: Option<(&str, &str)>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some((user_id, role)) = user {
        builder = builder.header("x-user-id", user_id).header("x-user-role", role);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Response should be JSON")
}

const PLAYER: Option<(&str, &str)> = Some(("player@example.com", "player"));
const ADMIN: Option<(&str, &str)> = Some(("admin@example.com", "admin"));

fn tournament_body(title: &str) -> Value {
    json!({
        "title": title,
        "game_name": "BGMI",
        "entry_fee": 0,
        "prize_pool": 1000,
        "host": "Arena Esports",
        "rules": "Squad, TPP.",
        "match_time": "2026-09-15T18:00:00Z",
        "image_url": null,
    })
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_server().await;

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_request_id_echoed_on_response() {
    let app = create_test_server().await;

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "trace-me-42"
    );
}

#[tokio::test]
async fn test_protected_routes_require_identity() {
    let app = create_test_server().await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/wallet/balance", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Public tournament listing works without headers.
    let response = app.oneshot(get("/api/v1/tournaments", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_balance_starts_at_zero() {
    let app = create_test_server().await;

    let response = app
        .oneshot(get("/api/v1/wallet/balance", PLAYER))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["user_id"], "player@example.com");
    assert_eq!(body["balance"], 0);
}

#[tokio::test]
async fn test_topup_approval_flow() {
    let app = create_test_server().await;

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/requests/topup",
            PLAYER,
            json!({ "amount": 500, "screenshot": "rcpt.png" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let submitted = json_body(response).await;
    assert_eq!(submitted["status"], "pending");
    let id = submitted["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            &format!("/api/v1/requests/{id}/resolve"),
            ADMIN,
            json!({ "outcome": "approved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let resolved = json_body(response).await;
    assert_eq!(resolved["status"], "approved");

    let response = app
        .clone()
        .oneshot(get("/api/v1/wallet/balance", PLAYER))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["balance"], 500);

    // Approval also left a notification.
    let response = app
        .oneshot(get("/api/v1/notifications", PLAYER))
        .await
        .unwrap();
    let inbox = json_body(response).await;
    assert_eq!(inbox.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_resolve_is_admin_only_and_one_shot() {
    let app = create_test_server().await;

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/requests/topup",
            PLAYER,
            json!({ "amount": 100 }),
        ))
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_i64().unwrap();
    let resolve_uri = format!("/api/v1/requests/{id}/resolve");

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            &resolve_uri,
            PLAYER,
            json!({ "outcome": "approved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            &resolve_uri,
            ADMIN,
            json!({ "outcome": "approved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(send(
            "POST",
            &resolve_uri,
            ADMIN,
            json!({ "outcome": "rejected" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_withdrawal_beyond_balance_is_bad_request() {
    let app = create_test_server().await;

    let response = app
        .oneshot(send(
            "POST",
            "/api/v1/requests/withdrawal",
            PLAYER,
            json!({ "amount": 1500, "target": { "method": "upi", "upi_id": "player@upi" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("Insufficient"));
}

#[tokio::test]
async fn test_request_queue_visibility() {
    let app = create_test_server().await;

    app.clone()
        .oneshot(send(
            "POST",
            "/api/v1/requests/topup",
            PLAYER,
            json!({ "amount": 100 }),
        ))
        .await
        .unwrap();

    // Players cannot read the queue.
    let response = app
        .clone()
        .oneshot(get("/api/v1/requests", PLAYER))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get("/api/v1/requests?status=pending", ADMIN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let queue = json_body(response).await;
    assert_eq!(queue.as_array().unwrap().len(), 1);

    // Owners can read their own request; others cannot.
    let response = app
        .clone()
        .oneshot(get("/api/v1/requests/1", PLAYER))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(
            "/api/v1/requests/1",
            Some(("other@example.com", "player")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tournament_lifecycle_over_http() {
    let app = create_test_server().await;

    // Players cannot create directly.
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/tournaments",
            PLAYER,
            tournament_body("Friday Cup"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/tournaments",
            ADMIN,
            tournament_body("Friday Cup"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = json_body(response).await["id"].as_i64().unwrap();

    // Join twice; both succeed, one participant row.
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(send(
                "POST",
                &format!("/api/v1/tournaments/{id}/join"),
                PLAYER,
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/v1/tournaments/{id}/participants"),
            PLAYER,
        ))
        .await
        .unwrap();
    let participants = json_body(response).await;
    assert_eq!(participants.as_array().unwrap().len(), 1);

    // Declare the winner, then read the public results.
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            &format!("/api/v1/tournaments/{id}/winners"),
            ADMIN,
            json!({ "winners": [{ "user_id": "player@example.com", "position": 1, "prize": 1000 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/tournaments/{id}/results"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let results = json_body(response).await;
    assert_eq!(results[0]["prize"], 1000);

    let response = app
        .oneshot(get("/api/v1/wallet/balance", PLAYER))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["balance"], 1000);
}

#[tokio::test]
async fn test_unknown_tournament_is_not_found() {
    let app = create_test_server().await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/tournaments/404", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(send(
            "POST",
            "/api/v1/tournaments/404/join",
            PLAYER,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_read_enforces_ownership() {
    let app = create_test_server().await;

    // Generate a notification by joining a tournament.
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/tournaments",
            ADMIN,
            tournament_body("Friday Cup"),
        ))
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_i64().unwrap();
    app.clone()
        .oneshot(send(
            "POST",
            &format!("/api/v1/tournaments/{id}/join"),
            PLAYER,
            json!({}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/v1/notifications", PLAYER))
        .await
        .unwrap();
    let inbox = json_body(response).await;
    let notification_id = inbox[0]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            &format!("/api/v1/notifications/{notification_id}/read"),
            Some(("other@example.com", "player")),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            &format!("/api/v1/notifications/{notification_id}/read"),
            PLAYER,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/api/v1/notifications/unread-count", PLAYER))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["unread"], 0);
}
