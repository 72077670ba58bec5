use axum::Json;
use civicwatch_shared::types::api::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("civicwatch-server", env!("CARGO_PKG_VERSION")))
}
