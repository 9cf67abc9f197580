//! Abuse throttling
//!
//! Fixed-window rate limiting for sensitive endpoints, with two backends:
//! a durable Redis store shared across instances, and an in-process fallback
//! for deployments that don't configure one. The backend is chosen once at
//! service construction; on durable-store failure the service fails open.

mod categories;
mod identity;
mod memory;
pub mod middleware;
mod redis;
mod service;

pub use categories::{RateCategory, WindowConfig};
pub use identity::client_key;
pub use memory::MemoryBackend;
pub use middleware::api_rate_limit;
pub use redis::{BackendError, RedisBackend};
pub use service::{Admission, AdmissionService, DurableBackend, RateLimitInfo};

/// Raw outcome of one fixed-window check, before response shaping.
#[derive(Debug, Clone, Copy)]
pub struct WindowDecision {
    /// Whether the request fit inside the window
    pub allowed: bool,
    /// Requests counted in the window so far, this one included if allowed
    pub count: u32,
    /// Unix timestamp at which the window resets
    pub resets_at_unix: i64,
}
