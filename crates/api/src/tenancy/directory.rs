//! Tenant directory lookup
//!
//! Resolving a subdomain happens before any tenant context exists, so the
//! directory read runs against the unscoped service pool. This is a
//! deliberate, narrow privilege escalation limited to exactly this one query.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// A church as the directory knows it
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChurchRecord {
    pub id: Uuid,
    pub subdomain: String,
    pub name: String,
}

/// Errors from the tenant directory.
///
/// Absence of a church is NOT an error (a mistyped or brand-new subdomain is
/// an expected outcome); only infrastructure failures surface here.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Directory query failed: {0}")]
    Query(String),
}

/// The tenant directory collaborator.
///
/// Object-safe so tests can inject a counting stub in place of Postgres.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Find the church claiming `subdomain` (already validated + lowercased).
    async fn find_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<Option<ChurchRecord>, DirectoryError>;
}

/// Postgres-backed tenant directory
pub struct PgTenantDirectory {
    pool: PgPool,
}

impl PgTenantDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantDirectory for PgTenantDirectory {
    async fn find_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<Option<ChurchRecord>, DirectoryError> {
        sqlx::query_as("SELECT id, subdomain, name FROM churches WHERE subdomain = $1")
            .bind(subdomain)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DirectoryError::Query(e.to_string()))
    }
}
