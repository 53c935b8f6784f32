//! Notification API handlers.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use esports_arena::auth::Identity;
use esports_arena::notifications::{Notification, NotificationError};
use serde::Serialize;
use serde_json::{Value, json};

use super::{ApiError, AppState, error};

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

fn notification_error(e: NotificationError) -> ApiError {
    let status = match &e {
        NotificationError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        NotificationError::NotFound(_) => StatusCode::NOT_FOUND,
        NotificationError::Forbidden(_) => StatusCode::FORBIDDEN,
    };
    error(status, e.client_message())
}

/// List the caller's notifications, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let list = state
        .notifications
        .list(&identity.user_id)
        .await
        .map_err(notification_error)?;

    Ok(Json(list))
}

/// Unread notification count for the caller's badge.
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let unread = state
        .notifications
        .unread_count(&identity.user_id)
        .await
        .map_err(notification_error)?;

    Ok(Json(UnreadCountResponse { unread }))
}

/// Mark one of the caller's notifications as read.
///
/// # Errors
///
/// - `404 Not Found`: Unknown notification id
/// - `403 Forbidden`: Notification belongs to another user
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(notification_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state
        .notifications
        .mark_read(notification_id, &identity.user_id)
        .await
        .map_err(notification_error)?;

    Ok(Json(json!({ "id": notification_id, "is_read": true })))
}
