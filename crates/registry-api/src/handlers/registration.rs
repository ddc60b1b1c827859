// ============================================================================
// Registry API - Registration Handlers
// File: crates/registry-api/src/handlers/registration.rs
// ============================================================================
//! Register, common students, and suspend endpoints

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use registry_core::services::{
    GetCommonStudentsParams, RegisterStudentsParams, RegistrationService, SuspendStudentParams,
};
use registry_core::DomainError;

use crate::error::ApiError;

/// Register request payload
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub teacher: String,
    pub students: Option<Vec<String>>,
}

/// Suspend request payload
#[derive(Debug, Deserialize)]
pub struct SuspendRequest {
    #[serde(default)]
    pub student: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommonStudentsResponse {
    pub students: Vec<String>,
}

/// Register handler - POST /api/register
pub async fn register(
    State(registry): State<Arc<RegistrationService>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload?;
    let fail = |e| ApiError::domain(StatusCode::UNPROCESSABLE_ENTITY, e);

    let students = payload
        .students
        .ok_or_else(|| fail(DomainError::Validation("students is required".to_string())))?;

    registry
        .register_students(RegisterStudentsParams {
            teacher: payload.teacher,
            students,
        })
        .await
        .map_err(fail)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Common students handler - GET /api/commonstudents?teacher=...&teacher=...
pub async fn common_students(
    State(registry): State<Arc<RegistrationService>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<CommonStudentsResponse>, ApiError> {
    let Query(pairs) = query?;
    let teachers: Vec<String> = pairs
        .into_iter()
        .filter(|(key, _)| key == "teacher")
        .map(|(_, value)| value)
        .collect();

    if teachers.is_empty() {
        return Err(ApiError::unprocessable("missing required query params"));
    }

    let students = registry
        .get_common_students(GetCommonStudentsParams { teachers })
        .await
        .map_err(|e| ApiError::domain(StatusCode::BAD_REQUEST, e))?;

    Ok(Json(CommonStudentsResponse { students }))
}

/// Suspend handler - POST /api/suspend
pub async fn suspend(
    State(registry): State<Arc<RegistrationService>>,
    payload: Result<Json<SuspendRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload?;

    registry
        .suspend(SuspendStudentParams {
            student: payload.student,
        })
        .await
        .map_err(|e| ApiError::domain(StatusCode::BAD_REQUEST, e))?;

    Ok(StatusCode::NO_CONTENT)
}
