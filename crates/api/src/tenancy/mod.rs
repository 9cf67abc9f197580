//! Tenant (church) resolution
//!
//! Every request is scoped to exactly one church. This module maps an
//! incoming host to a church identity:
//! - `grace.steeple.church` -> church with subdomain "grace"
//! - `grace.localhost` -> same, for local development
//! - an `x-church-id` header injected by the edge layer short-circuits
//!   resolution entirely

mod directory;
mod hostname;
pub mod middleware;
mod resolver;
mod subdomain;

pub use directory::{ChurchRecord, DirectoryError, PgTenantDirectory, TenantDirectory};
pub use hostname::subdomain_from_host;
pub use middleware::{optional_church, require_church, ChurchContext};
pub use resolver::{TenantResolver, CHURCH_ID_HEADER};
pub use subdomain::{is_valid_subdomain, RESERVED_SUBDOMAINS};
