use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use civicwatch_shared::errors::AppResult;
use civicwatch_shared::middleware::AdminUser;
use civicwatch_shared::types::api::ApiResponse;
use civicwatch_shared::types::auth::AuthUser;

use crate::models::{GlobalNotification, NewGlobalNotification, DISPLAY_CAP};
use crate::AppState;

/// GET /notifications
/// The caller's visible notifications, newest-first, capped for display.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<GlobalNotification>>>> {
    let mut items = state
        .notifications
        .get_for_user(&auth_user.state, &auth_user.lga, Some(&auth_user.id));
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.truncate(DISPLAY_CAP);

    Ok(Json(ApiResponse::ok(items)))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<UnreadCountResponse>>> {
    let count = state
        .notifications
        .unread_count(&auth_user.state, &auth_user.lga, &auth_user.id);

    Ok(Json(ApiResponse::ok(UnreadCountResponse { count })))
}

#[derive(Debug, serde::Serialize)]
pub struct UnreadCountResponse {
    pub count: usize,
}

/// POST /notifications
/// Add a notification to the shared pool. Any authenticated user can
/// publish; the audience rule decides who sees it.
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    _auth_user: AuthUser,
    Json(new): Json<NewGlobalNotification>,
) -> AppResult<Json<ApiResponse<CreatedResponse>>> {
    let id = state.notifications.add_global(new)?;
    Ok(Json(ApiResponse::ok(CreatedResponse { id })))
}

#[derive(Debug, serde::Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// POST /notifications/:id/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MarkReadResponse>>> {
    state.notifications.mark_read(&id, &auth_user.id)?;
    Ok(Json(ApiResponse::ok(MarkReadResponse { id })))
}

#[derive(Debug, serde::Serialize)]
pub struct MarkReadResponse {
    pub id: String,
}

/// DELETE /notifications
/// Administrative clear of the entire shared pool.
pub async fn clear_notifications(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<ApiResponse<()>>> {
    state.notifications.clear_all()?;
    Ok(Json(ApiResponse::ok_with_message((), "notification pool cleared")))
}
