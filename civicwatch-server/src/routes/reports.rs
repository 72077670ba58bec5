use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use civicwatch_shared::errors::AppResult;
use civicwatch_shared::middleware::ChampionUser;
use civicwatch_shared::types::api::ApiResponse;
use civicwatch_shared::types::auth::AuthUser;
use civicwatch_shared::types::pagination::{Paginated, PaginationParams};

use crate::models::{NewReport, Report, VerifyRequest};
use crate::AppState;

/// GET /reports
/// All reports, paginated, newest first.
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    _auth_user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Report>>>> {
    let mut reports = state.reports.list_all();
    reports.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

    let total = reports.len() as u64;
    let items = reports
        .into_iter()
        .skip(params.offset() as usize)
        .take(params.limit() as usize)
        .collect();

    Ok(Json(ApiResponse::ok(Paginated::new(items, total, &params))))
}

/// GET /projects/:id/reports
pub async fn project_reports(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<u32>,
) -> AppResult<Json<ApiResponse<Vec<Report>>>> {
    // Surface a 404 for unknown projects rather than an empty list.
    state.projects.get(project_id)?;
    Ok(Json(ApiResponse::ok(state.reports.list_for_project(project_id))))
}

/// POST /reports
pub async fn submit_report(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Json(new): Json<NewReport>,
) -> AppResult<Json<ApiResponse<Report>>> {
    Ok(Json(ApiResponse::ok(state.reports.submit(&auth_user, new)?)))
}

/// POST /reports/:id/verify
/// Champion-only review of a submitted report.
pub async fn verify_report(
    State(state): State<Arc<AppState>>,
    ChampionUser(champion): ChampionUser,
    Path(id): Path<u32>,
    Json(req): Json<VerifyRequest>,
) -> AppResult<Json<ApiResponse<Report>>> {
    Ok(Json(ApiResponse::ok(state.reports.verify(id, &champion, req.approved)?)))
}
