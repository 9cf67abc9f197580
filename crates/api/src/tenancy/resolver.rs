//! Tenant context resolution
//!
//! The component handlers actually call. Resolution order:
//! 1. Trust the `x-church-id` header if the edge layer already resolved the
//!    tenant once for this request (no second directory lookup).
//! 2. Otherwise parse the request's own host and look the subdomain up in
//!    the directory.
//!
//! Read-only and free of shared mutable state, so unlimited concurrent calls
//! are safe.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, Uri};
use uuid::Uuid;

use steeple_shared::ChurchId;

use super::directory::TenantDirectory;
use super::hostname::subdomain_from_host;
use super::subdomain::is_valid_subdomain;
use crate::error::ApiError;

/// Header set by the edge layer once it has resolved the tenant for a request.
///
/// Trusting it lets server-rendered and client-fetch paths agree on tenant
/// identity without each paying for their own directory lookup.
pub const CHURCH_ID_HEADER: &str = "x-church-id";

/// Upper bound on the directory lookup. A slow directory must not
/// accumulate unbounded concurrent waiters on the request path.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// Resolves requests to church identities
#[derive(Clone)]
pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
}

impl TenantResolver {
    pub fn new(directory: Arc<dyn TenantDirectory>) -> Self {
        Self { directory }
    }

    /// Resolve the church for a request, if there is one.
    ///
    /// Returns `Ok(None)` when the request targets the root domain, an
    /// unclaimed subdomain, or a label that fails validation; during
    /// resolution those all collapse into "no church here".
    pub async fn resolve(
        &self,
        headers: &HeaderMap,
        uri: &Uri,
    ) -> Result<Option<ChurchId>, ApiError> {
        // 1. Upstream-injected identity: trust it verbatim. A malformed value
        //    falls through to host parsing rather than failing the request.
        if let Some(value) = headers.get(CHURCH_ID_HEADER) {
            if let Some(id) = value
                .to_str()
                .ok()
                .and_then(|s| Uuid::from_str(s.trim()).ok())
            {
                return Ok(Some(ChurchId(id)));
            }
            tracing::debug!("ignoring malformed {CHURCH_ID_HEADER} header");
        }

        // 2. The request's own host: URI authority first, Host header fallback.
        let host = match uri.host() {
            Some(h) => h.to_string(),
            None => match headers.get("host").and_then(|h| h.to_str().ok()) {
                Some(h) => h.to_string(),
                None => return Ok(None),
            },
        };

        let Some(subdomain) = subdomain_from_host(&host) else {
            return Ok(None);
        };
        if !is_valid_subdomain(&subdomain) {
            return Ok(None);
        }

        let lookup = self.directory.find_by_subdomain(&subdomain);
        let found = match tokio::time::timeout(LOOKUP_TIMEOUT, lookup).await {
            Ok(result) => result.map_err(|e| ApiError::Database(e.to_string()))?,
            Err(_) => {
                return Err(ApiError::Database(format!(
                    "tenant directory lookup exceeded {LOOKUP_TIMEOUT:?}"
                )));
            }
        };

        Ok(found.map(|church| ChurchId(church.id)))
    }

    /// Resolve the church for a request, failing if there is none.
    pub async fn require(&self, headers: &HeaderMap, uri: &Uri) -> Result<ChurchId, ApiError> {
        self.resolve(headers, uri)
            .await?
            .ok_or(ApiError::TenantNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenancy::directory::{ChurchRecord, DirectoryError};
    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Directory stub that counts lookups and knows one subdomain.
    struct CountingDirectory {
        record: ChurchRecord,
        lookups: AtomicUsize,
    }

    impl CountingDirectory {
        fn new(subdomain: &str) -> Self {
            Self {
                record: ChurchRecord {
                    id: Uuid::new_v4(),
                    subdomain: subdomain.to_string(),
                    name: "Grace Community".to_string(),
                },
                lookups: AtomicUsize::new(0),
            }
        }

        fn church_id(&self) -> ChurchId {
            ChurchId(self.record.id)
        }

        fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TenantDirectory for CountingDirectory {
        async fn find_by_subdomain(
            &self,
            subdomain: &str,
        ) -> Result<Option<ChurchRecord>, DirectoryError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if subdomain == self.record.subdomain {
                Ok(Some(self.record.clone()))
            } else {
                Ok(None)
            }
        }
    }

    /// Directory stub that never answers.
    struct StalledDirectory;

    #[async_trait]
    impl TenantDirectory for StalledDirectory {
        async fn find_by_subdomain(
            &self,
            _subdomain: &str,
        ) -> Result<Option<ChurchRecord>, DirectoryError> {
            std::future::pending().await
        }
    }

    fn headers_with_host(host: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_str(host).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_header_short_circuits_directory() {
        let directory = Arc::new(CountingDirectory::new("grace"));
        let resolver = TenantResolver::new(directory.clone());

        let id = Uuid::new_v4();
        let mut headers = headers_with_host("grace.steeple.church");
        headers.insert(
            CHURCH_ID_HEADER,
            HeaderValue::from_str(&id.to_string()).unwrap(),
        );

        let resolved = resolver
            .resolve(&headers, &Uri::from_static("/members"))
            .await
            .unwrap();

        // Returned verbatim, zero lookups performed
        assert_eq!(resolved, Some(ChurchId(id)));
        assert_eq!(directory.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_header_falls_back_to_host() {
        let directory = Arc::new(CountingDirectory::new("grace"));
        let resolver = TenantResolver::new(directory.clone());

        let mut headers = headers_with_host("grace.steeple.church");
        headers.insert(CHURCH_ID_HEADER, HeaderValue::from_static("not-a-uuid"));

        let resolved = resolver
            .resolve(&headers, &Uri::from_static("/members"))
            .await
            .unwrap();

        assert_eq!(resolved, Some(directory.church_id()));
        assert_eq!(directory.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_resolves_from_host_header() {
        let directory = Arc::new(CountingDirectory::new("grace"));
        let resolver = TenantResolver::new(directory.clone());

        let headers = headers_with_host("grace.steeple.church");
        let resolved = resolver
            .resolve(&headers, &Uri::from_static("/"))
            .await
            .unwrap();

        assert_eq!(resolved, Some(directory.church_id()));
    }

    #[tokio::test]
    async fn test_root_domain_resolves_to_none() {
        let directory = Arc::new(CountingDirectory::new("grace"));
        let resolver = TenantResolver::new(directory.clone());

        let headers = headers_with_host("steeple.church");
        let resolved = resolver
            .resolve(&headers, &Uri::from_static("/"))
            .await
            .unwrap();

        assert_eq!(resolved, None);
        // Root domain never reaches the directory
        assert_eq!(directory.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_reserved_subdomain_collapses_to_none() {
        let directory = Arc::new(CountingDirectory::new("grace"));
        let resolver = TenantResolver::new(directory.clone());

        let headers = headers_with_host("admin.steeple.church");
        let resolved = resolver
            .resolve(&headers, &Uri::from_static("/"))
            .await
            .unwrap();

        assert_eq!(resolved, None);
        assert_eq!(directory.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_subdomain_resolves_to_none() {
        let directory = Arc::new(CountingDirectory::new("grace"));
        let resolver = TenantResolver::new(directory.clone());

        let headers = headers_with_host("mystery.steeple.church");
        let resolved = resolver
            .resolve(&headers, &Uri::from_static("/"))
            .await
            .unwrap();

        assert_eq!(resolved, None);
        assert_eq!(directory.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_require_fails_when_unresolved() {
        let directory = Arc::new(CountingDirectory::new("grace"));
        let resolver = TenantResolver::new(directory);

        let headers = headers_with_host("steeple.church");
        let result = resolver.require(&headers, &Uri::from_static("/")).await;

        assert!(matches!(result, Err(ApiError::TenantNotFound)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_is_timeout_bounded() {
        let resolver = TenantResolver::new(Arc::new(StalledDirectory));

        let headers = headers_with_host("grace.steeple.church");
        let result = resolver.resolve(&headers, &Uri::from_static("/")).await;

        // The paused clock auto-advances to the timeout instead of hanging
        assert!(matches!(result, Err(ApiError::Database(_))));
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let directory = Arc::new(CountingDirectory::new("grace"));
        let resolver = TenantResolver::new(directory.clone());

        let headers = headers_with_host("grace.localhost:3000");
        let uri = Uri::from_static("/members");

        let first = resolver.resolve(&headers, &uri).await.unwrap();
        let second = resolver.resolve(&headers, &uri).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, Some(directory.church_id()));
    }
}
