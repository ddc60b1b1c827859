//! Student and teacher creation endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use registry_core::services::{CreateStudentParams, CreateTeacherParams, RegistrationService};

use crate::error::ApiError;

/// Shared payload of `POST /api/students` and `POST /api/teachers`.
#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    #[serde(default)]
    pub email: String,
    pub name: Option<String>,
}

/// POST /api/students
pub async fn create_student(
    State(registry): State<Arc<RegistrationService>>,
    payload: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload?;

    registry
        .create_student(CreateStudentParams {
            email: payload.email,
            name: payload.name,
        })
        .await
        .map_err(|e| ApiError::domain(StatusCode::BAD_REQUEST, e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/teachers
pub async fn create_teacher(
    State(registry): State<Arc<RegistrationService>>,
    payload: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload?;

    registry
        .create_teacher(CreateTeacherParams {
            email: payload.email,
            name: payload.name,
        })
        .await
        .map_err(|e| ApiError::domain(StatusCode::BAD_REQUEST, e))?;

    Ok(StatusCode::NO_CONTENT)
}
