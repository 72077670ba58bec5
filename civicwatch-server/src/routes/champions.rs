use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use civicwatch_shared::errors::AppResult;
use civicwatch_shared::types::api::ApiResponse;

use crate::models::Champion;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChampionQuery {
    pub state: Option<String>,
}

/// GET /champions?state=
pub async fn list_champions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChampionQuery>,
) -> AppResult<Json<ApiResponse<Vec<Champion>>>> {
    let champions = state
        .champions
        .iter()
        .filter(|c| match &query.state {
            Some(s) => c.state.eq_ignore_ascii_case(s),
            None => true,
        })
        .cloned()
        .collect();

    Ok(Json(ApiResponse::ok(champions)))
}
