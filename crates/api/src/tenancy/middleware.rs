//! Tenant-resolution middleware
//!
//! `require_church` gates routes that only make sense inside a tenant;
//! `optional_church` lets root-domain handlers (signup, marketing pages)
//! see the tenant when there is one.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use steeple_shared::ChurchId;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolved tenant identity, inserted as a request extension
#[derive(Debug, Clone, Copy)]
pub struct ChurchContext {
    pub church_id: ChurchId,
}

/// Resolve the church for this request and fail if there is none.
pub async fn require_church(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let church_id = state.resolver.require(req.headers(), req.uri()).await?;
    req.extensions_mut().insert(ChurchContext { church_id });
    Ok(next.run(req).await)
}

/// Resolve the church for this request if there is one; the handler decides
/// what an absent tenant means.
pub async fn optional_church(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(church_id) = state.resolver.resolve(req.headers(), req.uri()).await? {
        req.extensions_mut().insert(ChurchContext { church_id });
    }
    Ok(next.run(req).await)
}
