//! Steeple API Library
//!
//! This crate contains the API server components for Steeple. The load-bearing
//! pieces are the request-admission layer every inbound request passes through:
//! tenant (church) resolution from the request host, and dual-backend rate
//! limiting for abuse-sensitive endpoints.

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod tenancy;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use rate_limit::{AdmissionService, RateCategory};
pub use state::AppState;
pub use tenancy::{TenantDirectory, TenantResolver};
