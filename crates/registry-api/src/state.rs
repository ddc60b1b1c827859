use std::sync::Arc;
use axum::extract::FromRef;

use registry_core::services::RegistrationService;
use registry_security::JwtService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RegistrationService>,
    pub jwt: Arc<JwtService>,
}

impl FromRef<AppState> for Arc<RegistrationService> {
    fn from_ref(state: &AppState) -> Self {
        state.registry.clone()
    }
}

impl FromRef<AppState> for Arc<JwtService> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
