use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use registry_security::JwtService;
use registry_shared::constants::TOKEN_HEADER;

use crate::error::ApiError;

/// Rejects requests without a valid signed token in the `Token` header.
pub async fn require_token(
    State(jwt): State<Arc<JwtService>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Not Authorized"))?;

    let claims = jwt
        .validate_token(token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;
    debug!("Token accepted for client {}", claims.client);

    Ok(next.run(request).await)
}
