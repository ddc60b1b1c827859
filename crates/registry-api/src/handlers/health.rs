use axum::{http::StatusCode, Json};

/// GET /healthz
pub async fn health_check() -> (StatusCode, Json<&'static str>) {
    (StatusCode::OK, Json("OK"))
}
