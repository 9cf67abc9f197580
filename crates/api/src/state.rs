//! Shared application state

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::rate_limit::AdmissionService;
use crate::tenancy::{PgTenantDirectory, TenantDirectory, TenantResolver};

/// State shared across all request handlers.
///
/// All process-wide mutable structures (the fallback rate-limit map, the
/// memoized durable windows) live behind the admission service here, not in
/// module globals, so tests construct isolated instances.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: PgPool,
    pub directory: Arc<dyn TenantDirectory>,
    pub resolver: TenantResolver,
    pub admission: Arc<AdmissionService>,
}

impl AppState {
    /// Build the full state from configuration: directory, resolver, and the
    /// admission service with its deployment-selected backend.
    pub async fn new(config: Config, db: PgPool) -> anyhow::Result<Self> {
        let directory: Arc<dyn TenantDirectory> = Arc::new(PgTenantDirectory::new(db.clone()));
        let resolver = TenantResolver::new(directory.clone());
        let admission = Arc::new(AdmissionService::from_config(&config).await?);

        Ok(Self {
            config: Arc::new(config),
            db,
            directory,
            resolver,
            admission,
        })
    }
}
