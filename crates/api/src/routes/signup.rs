//! Self-service signup support
//!
//! Subdomain availability uses the same validity check that gates tenant
//! resolution, so signup can never claim a label resolution would refuse.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::rate_limit::{Admission, RateCategory};
use crate::state::AppState;
use crate::tenancy::is_valid_subdomain;

#[derive(Debug, Deserialize)]
pub struct CheckSubdomainRequest {
    pub subdomain: String,
}

/// Validate a requested subdomain and report whether it is still unclaimed.
pub async fn check_subdomain(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CheckSubdomainRequest>,
) -> ApiResult<Json<Value>> {
    if let Admission::Limited(info) = state.admission.check(RateCategory::Signup, &headers).await {
        return Err(ApiError::RateLimited(info));
    }

    let subdomain = req.subdomain.trim().to_lowercase();
    if !is_valid_subdomain(&subdomain) {
        return Err(ApiError::InvalidSubdomain(
            "Subdomains are 3-30 characters of a-z, 0-9 and hyphens, and may not be a reserved name".to_string(),
        ));
    }

    let taken = state
        .directory
        .find_by_subdomain(&subdomain)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?
        .is_some();

    Ok(Json(json!({
        "subdomain": subdomain,
        "available": !taken,
    })))
}
