// ============================================================================
// Registry API - Auth Handler
// File: crates/registry-api/src/handlers/auth.rs
// ============================================================================

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::info;

use registry_security::JwtService;
use registry_shared::constants::TOKEN_HEADER;

use crate::error::ApiError;

/// Token handler - GET/POST /auth
///
/// Responds 204 with the signed token in the `Token` header.
pub async fn issue_token(State(jwt): State<Arc<JwtService>>) -> Result<Response, ApiError> {
    let token = jwt
        .generate_token()
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;
    let value = HeaderValue::from_str(&token).map_err(|e| ApiError::unauthorized(e.to_string()))?;

    info!("Issued access token");
    Ok((
        StatusCode::NO_CONTENT,
        [
            (header::HeaderName::from_static(TOKEN_HEADER), value),
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
        ],
    )
        .into_response())
}
