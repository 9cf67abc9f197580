//! Application configuration

use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub base_domain: String, // e.g., "steeple.church" for *.steeple.church routing

    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // Rate limiting (durable backend; both must be set to enable it)
    pub rate_limit_redis_url: Option<String>,
    pub rate_limit_redis_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            base_domain: env::var("BASE_DOMAIN").unwrap_or_else(|_| "localhost".to_string()),

            // Database
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // Rate limiting
            rate_limit_redis_url: env::var("RATE_LIMIT_REDIS_URL").ok(),
            rate_limit_redis_token: env::var("RATE_LIMIT_REDIS_TOKEN").ok(),
        })
    }

    /// The durable rate-limit store settings, if the deployment configured them.
    ///
    /// Backend selection is a deployment-time decision: both settings present
    /// means the Redis backend is used for every category, otherwise the
    /// in-process fallback is. The choice is made once at service construction
    /// and never re-checked per request.
    pub fn rate_limit_redis(&self) -> Option<(&str, &str)> {
        match (&self.rate_limit_redis_url, &self.rate_limit_redis_token) {
            (Some(url), Some(token)) => Some((url.as_str(), token.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
