//! Admission control
//!
//! The service every sensitive handler consults before doing work. Owns the
//! backend strategy (chosen once at construction from configuration, never
//! re-checked per call) and shapes rejections into the standard throttling
//! metadata.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use time::OffsetDateTime;

use super::categories::RateCategory;
use super::identity::client_key;
use super::memory::MemoryBackend;
use super::redis::{BackendError, RedisBackend};
use super::WindowDecision;
use crate::config::Config;

/// Metadata attached to a rejected request, ready for 429 translation
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    pub limit: u32,
    pub remaining: u32,
    pub resets_at: OffsetDateTime,
    pub retry_after_secs: u64,
}

/// The admission decision for one request
#[derive(Debug, Clone)]
pub enum Admission {
    Allowed,
    Limited(RateLimitInfo),
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed)
    }
}

/// The durable-store seam. `RedisBackend` is the production
/// implementation; the trait lets tests drive the error path with a
/// failing stand-in.
#[async_trait]
pub trait DurableBackend: Send + Sync {
    async fn check(
        &self,
        category: RateCategory,
        key: &str,
    ) -> Result<WindowDecision, BackendError>;
}

#[async_trait]
impl DurableBackend for RedisBackend {
    async fn check(
        &self,
        category: RateCategory,
        key: &str,
    ) -> Result<WindowDecision, BackendError> {
        RedisBackend::check(self, category, key).await
    }
}

enum Backend {
    Durable(Arc<dyn DurableBackend>),
    Memory(MemoryBackend),
}

/// Rate-limit admission service
pub struct AdmissionService {
    backend: Backend,
}

impl AdmissionService {
    /// Build the service with the backend the deployment configured:
    /// durable when the Redis endpoint + credential are both set, the
    /// in-process fallback otherwise.
    pub async fn from_config(
        config: &Config,
    ) -> Result<Self, super::redis::BackendError> {
        match config.rate_limit_redis() {
            Some((url, token)) => {
                let backend = RedisBackend::connect(url, token).await?;
                tracing::info!("rate limiting: durable Redis backend");
                Ok(Self::with_durable(Arc::new(backend)))
            }
            None => {
                tracing::info!("rate limiting: in-process fallback backend");
                Ok(Self::in_memory())
            }
        }
    }

    /// Service backed by the in-process fallback (also the test default).
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryBackend::new()),
        }
    }

    /// Service backed by an already-connected durable store.
    pub fn with_durable(backend: Arc<dyn DurableBackend>) -> Self {
        Self {
            backend: Backend::Durable(backend),
        }
    }

    /// Check admission for a request against a category's window.
    pub async fn check(&self, category: RateCategory, headers: &HeaderMap) -> Admission {
        let key = client_key(headers);
        self.check_key(category, &key).await
    }

    /// Check admission for an explicit bucket key.
    pub async fn check_key(&self, category: RateCategory, key: &str) -> Admission {
        let config = category.config();

        let decision = match &self.backend {
            Backend::Memory(backend) => backend.check(category, key, &config),
            Backend::Durable(backend) => match backend.check(category, key).await {
                Ok(decision) => decision,
                Err(err) => {
                    // Fail OPEN: an infrastructure outage must not block
                    // legitimate traffic.
                    tracing::error!(
                        category = category.as_str(),
                        error = %err,
                        "rate-limit backend unavailable, admitting request"
                    );
                    return Admission::Allowed;
                }
            },
        };

        if decision.allowed {
            return Admission::Allowed;
        }

        let now = OffsetDateTime::now_utc();
        let retry_after_secs = (decision.resets_at_unix - now.unix_timestamp()).max(1) as u64;
        let resets_at = OffsetDateTime::from_unix_timestamp(decision.resets_at_unix)
            .unwrap_or(now);

        Admission::Limited(RateLimitInfo {
            limit: config.max_requests,
            remaining: config.max_requests.saturating_sub(decision.count),
            resets_at,
            retry_after_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn test_admits_within_category_limit() {
        let service = AdmissionService::in_memory();

        // Auth allows 5 per window
        for i in 1..=5 {
            let admission = service.check_key(RateCategory::Auth, "1.2.3.4").await;
            assert!(admission.is_allowed(), "request {i} should be admitted");
        }

        let admission = service.check_key(RateCategory::Auth, "1.2.3.4").await;
        let Admission::Limited(info) = admission else {
            panic!("6th auth attempt should be limited");
        };
        assert_eq!(info.limit, 5);
        assert_eq!(info.remaining, 0);
        assert!(info.retry_after_secs >= 1);
        assert!(info.retry_after_secs <= 15 * 60);
    }

    #[tokio::test]
    async fn test_identifiers_do_not_share_buckets() {
        let service = AdmissionService::in_memory();

        for _ in 0..5 {
            service.check_key(RateCategory::Auth, "1.1.1.1").await;
        }
        assert!(!service
            .check_key(RateCategory::Auth, "1.1.1.1")
            .await
            .is_allowed());

        // A different client is untouched
        assert!(service
            .check_key(RateCategory::Auth, "2.2.2.2")
            .await
            .is_allowed());
    }

    /// Durable store that is down: every call errors.
    struct OutageStore;

    #[async_trait]
    impl DurableBackend for OutageStore {
        async fn check(
            &self,
            _category: RateCategory,
            _key: &str,
        ) -> Result<WindowDecision, BackendError> {
            Err(BackendError::Timeout)
        }
    }

    #[tokio::test]
    async fn test_fail_open_on_backend_failure() {
        let service = AdmissionService::with_durable(Arc::new(OutageStore));

        // Far past any limit, every request is still admitted
        for _ in 0..200 {
            let admission = service.check_key(RateCategory::Auth, "1.2.3.4").await;
            assert!(admission.is_allowed());
        }
    }

    #[tokio::test]
    async fn test_check_uses_request_identity() {
        let service = AdmissionService::in_memory();

        let mut headers_a = HeaderMap::new();
        headers_a.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));
        let mut headers_b = HeaderMap::new();
        headers_b.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.8"));

        for _ in 0..3 {
            service.check(RateCategory::PasswordReset, &headers_a).await;
        }
        assert!(!service
            .check(RateCategory::PasswordReset, &headers_a)
            .await
            .is_allowed());
        assert!(service
            .check(RateCategory::PasswordReset, &headers_b)
            .await
            .is_allowed());
    }
}
