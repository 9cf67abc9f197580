//! Rate-limit middleware
//!
//! Router-wide enforcement of the generic API category. Sensitive handlers
//! with their own category (signup, password reset, imports) call the
//! admission service directly instead.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{Admission, RateCategory};
use crate::error::ApiError;
use crate::state::AppState;

/// Enforce the generic API window on every request passing through.
pub async fn api_rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match state.admission.check(RateCategory::Api, req.headers()).await {
        Admission::Allowed => next.run(req).await,
        Admission::Limited(info) => ApiError::RateLimited(info).into_response(),
    }
}
