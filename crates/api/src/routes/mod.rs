//! API routes

pub mod church;
pub mod health;
pub mod signup;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::rate_limit::middleware::api_rate_limit;
use crate::state::AppState;
use crate::tenancy::middleware::{optional_church, require_church};

/// Create all API routes
pub fn create_router(state: AppState) -> Router {
    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Public API routes (no tenant required) - under /api/v1
    // Signup runs on the root domain, but a request arriving on a claimed
    // subdomain still gets its tenant context attached.
    let public_api_routes = Router::new()
        .route("/signup/check-subdomain", post(signup::check_subdomain))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_church,
        ));

    // Tenant-scoped API routes - under /api/v1
    let church_api_routes = Router::new()
        .route("/church", get(church::current_church))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_church,
        ));

    let api_routes = Router::new()
        .merge(public_api_routes)
        .merge(church_api_routes)
        // Generic API window across everything under /api/v1
        .route_layer(middleware::from_fn_with_state(state.clone(), api_rate_limit));

    Router::new()
        .merge(health_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
