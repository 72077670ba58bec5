use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use civicwatch_shared::errors::AppResult;
use civicwatch_shared::types::api::ApiResponse;
use civicwatch_shared::types::auth::AuthUser;

use crate::models::{NewProject, Project, ProjectFilter, ProjectListing, ProjectUpdate};
use crate::AppState;

/// GET /projects?state=&category=&status=&search=
/// Public listing with aggregate stats over the filtered set.
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<Json<ApiResponse<ProjectListing>>> {
    Ok(Json(ApiResponse::ok(state.projects.list(&filter))))
}

/// GET /projects/:id
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> AppResult<Json<ApiResponse<Project>>> {
    Ok(Json(ApiResponse::ok(state.projects.get(id)?)))
}

/// POST /projects
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Json(new): Json<NewProject>,
) -> AppResult<Json<ApiResponse<Project>>> {
    let project = state.projects.create(new);
    tracing::info!(project_id = project.id, user_id = %auth_user.id, "project submitted");
    Ok(Json(ApiResponse::ok(project)))
}

/// PATCH /projects/:id
/// Partial merge; only supplied fields change.
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    _auth_user: AuthUser,
    Path(id): Path<u32>,
    Json(update): Json<ProjectUpdate>,
) -> AppResult<Json<ApiResponse<Project>>> {
    Ok(Json(ApiResponse::ok(state.projects.update(id, update)?)))
}
