use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use registry_core::services::{RegistrationService, SendNotificationsParams};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct NotificationRequest {
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub notification: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub recipients: Vec<String>,
}

/// Recipients handler - POST /api/retrievefornotifications
pub async fn retrieve_for_notifications(
    State(registry): State<Arc<RegistrationService>>,
    payload: Result<Json<NotificationRequest>, JsonRejection>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let Json(payload) = payload?;

    let recipients = registry
        .send_notifications(SendNotificationsParams {
            teacher: payload.teacher,
            notification: payload.notification,
        })
        .await
        .map_err(|e| ApiError::domain(StatusCode::BAD_REQUEST, e))?;

    Ok(Json(NotificationResponse { recipients }))
}
