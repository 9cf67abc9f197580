//! API error types and handling

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use time::format_description::well_known::Rfc3339;

use crate::rate_limit::RateLimitInfo;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Tenancy errors
    #[error("No church found for this address")]
    TenantNotFound,
    #[error("Invalid subdomain: {0}")]
    InvalidSubdomain(String),

    // Rate limiting
    #[error("Too many requests")]
    RateLimited(RateLimitInfo),

    // Internal errors
    #[error("Database error: {0}")]
    Database(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Surfaced as an authorization-style error: the request reached a
            // host that doesn't map to any church, so nothing below the
            // admission layer may run.
            ApiError::TenantNotFound => {
                let body = Json(json!({
                    "error": {
                        "code": "TENANT_NOT_FOUND",
                        "message": "No such organization",
                    }
                }));
                (StatusCode::FORBIDDEN, body).into_response()
            }

            ApiError::InvalidSubdomain(msg) => {
                let body = Json(json!({
                    "error": {
                        "code": "INVALID_SUBDOMAIN",
                        "message": msg,
                    }
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }

            ApiError::RateLimited(info) => rate_limited_response(&info),

            ApiError::Database(_) => {
                let body = Json(json!({
                    "error": {
                        "code": "DATABASE_ERROR",
                        "message": "Database error",
                    }
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

/// Build the 429 response with standard throttling headers.
fn rate_limited_response(info: &RateLimitInfo) -> Response {
    let body = Json(json!({
        "error": "Too many requests",
        "retryAfter": info.retry_after_secs,
    }));

    let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
    let headers = response.headers_mut();

    if let Ok(v) = HeaderValue::from_str(&info.retry_after_secs.to_string()) {
        headers.insert(header::RETRY_AFTER, v);
    }
    if let Ok(v) = HeaderValue::from_str(&info.limit.to_string()) {
        headers.insert("x-ratelimit-limit", v);
    }
    if let Ok(v) = HeaderValue::from_str(&info.remaining.to_string()) {
        headers.insert("x-ratelimit-remaining", v);
    }
    if let Ok(reset) = info.resets_at.format(&Rfc3339) {
        if let Ok(v) = HeaderValue::from_str(&reset) {
            headers.insert("x-ratelimit-reset", v);
        }
    }

    response
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
