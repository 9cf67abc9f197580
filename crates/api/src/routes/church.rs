//! Tenant identity endpoint

use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::tenancy::ChurchContext;

/// Return the church this request resolved to.
///
/// Server-rendered and client-fetch code paths both use this to agree on
/// tenant identity regardless of how the edge layer resolved it.
pub async fn current_church(Extension(ctx): Extension<ChurchContext>) -> ApiResult<Json<Value>> {
    Ok(Json(json!({ "churchId": ctx.church_id })))
}
