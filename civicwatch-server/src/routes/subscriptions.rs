use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use civicwatch_shared::errors::{AppError, AppResult, ErrorCode};
use civicwatch_shared::types::api::ApiResponse;
use civicwatch_shared::types::auth::AuthUser;

use crate::models::Subscription;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    pub state: String,
    pub lga: String,
}

/// PUT /notifications/subscription
/// Upsert the caller's locality subscription.
pub async fn put_subscription(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Json(req): Json<SubscriptionRequest>,
) -> AppResult<Json<ApiResponse<Subscription>>> {
    if req.state.trim().is_empty() || req.lga.trim().is_empty() {
        return Err(AppError::Validation("state and lga must not be empty".into()));
    }
    let subscription = state
        .notifications
        .subscribe_user(&auth_user.id, req.state.trim(), req.lga.trim())?;
    Ok(Json(ApiResponse::ok(subscription)))
}

/// GET /notifications/subscription
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<Subscription>>> {
    let subscription = state
        .notifications
        .subscription(&auth_user.id)
        .ok_or_else(|| AppError::new(ErrorCode::SubscriptionNotFound, "no subscription on file"))?;
    Ok(Json(ApiResponse::ok(subscription)))
}
