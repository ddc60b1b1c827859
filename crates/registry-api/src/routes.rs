// ============================================================================
// Registry API - Router
// File: crates/registry-api/src/routes.rs
// ============================================================================

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use registry_shared::config::HttpSettings;
use registry_shared::constants::TOKEN_HEADER;

use crate::handlers::{auth, directory, health, notification, registration};
use crate::middleware::require_token;
use crate::state::AppState;

pub fn build_router(state: AppState, http: &HttpSettings) -> Router {
    // Public routes (no token)
    let public_routes = Router::new()
        .route("/healthz", get(health::health_check))
        .route("/auth", get(auth::issue_token).post(auth::issue_token));

    // Protected routes
    let api_routes = Router::new()
        .route("/api/register", post(registration::register))
        .route("/api/commonstudents", get(registration::common_students))
        .route("/api/suspend", post(registration::suspend))
        .route(
            "/api/retrievefornotifications",
            post(notification::retrieve_for_notifications),
        )
        .route("/api/students", post(directory::create_student))
        .route("/api/teachers", post(directory::create_teacher))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(http.request_timeout_secs)))
        .layer(cors_layer(&http.cors_allowed_origins))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::CACHE_CONTROL,
            HeaderName::from_static(TOKEN_HEADER),
        ])
        .expose_headers([HeaderName::from_static(TOKEN_HEADER)]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed)).allow_credentials(true)
}
