//! Durable rate-limit backend (Redis)
//!
//! Fixed-window counters shared across all app instances. Each category maps
//! to its own named window, lazily constructed once and memoized for the
//! process lifetime. Every store call is bounded by a timeout so a slow
//! Redis cannot stall the request path; the caller treats any failure as
//! fail-open.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, IntoConnectionInfo};
use time::OffsetDateTime;

use super::categories::{RateCategory, WindowConfig};
use super::WindowDecision;

/// Upper bound on any single store call
const CALL_TIMEOUT: Duration = Duration::from_secs(3);

/// Errors from the durable store. Never surfaced to end users; the admission
/// service logs them and admits the request.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Redis call exceeded {CALL_TIMEOUT:?}")]
    Timeout,
}

/// A named fixed window for one category
#[derive(Debug)]
struct NamedWindow {
    key_prefix: String,
    config: WindowConfig,
}

/// Redis-backed fixed-window rate limiter
pub struct RedisBackend {
    conn: ConnectionManager,
    // Lazily-built per-category windows, memoized for the process lifetime
    windows: Mutex<HashMap<RateCategory, Arc<NamedWindow>>>,
}

impl RedisBackend {
    /// Connect to the durable store with the configured endpoint and credential.
    pub async fn connect(url: &str, token: &str) -> Result<Self, BackendError> {
        let mut info = url.into_connection_info()?;
        info.redis.password = Some(token.to_string());
        let client = redis::Client::open(info)?;

        let conn = tokio::time::timeout(CALL_TIMEOUT, client.get_connection_manager())
            .await
            .map_err(|_| BackendError::Timeout)??;

        Ok(Self {
            conn,
            windows: Mutex::new(HashMap::new()),
        })
    }

    fn window(&self, category: RateCategory) -> Arc<NamedWindow> {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(windows.entry(category).or_insert_with(|| {
            Arc::new(NamedWindow {
                key_prefix: format!("ratelimit:{}", category.as_str()),
                config: category.config(),
            })
        }))
    }

    /// Run a fixed-window check for (category, key) against the store.
    pub async fn check(
        &self,
        category: RateCategory,
        key: &str,
    ) -> Result<WindowDecision, BackendError> {
        let window = self.window(category);
        let redis_key = format!("{}:{}", window.key_prefix, key);
        let window_secs = window.config.window.as_secs() as i64;

        let mut conn = self.conn.clone();
        let call = async {
            let (count, ttl): (u32, i64) = redis::pipe()
                .atomic()
                .incr(&redis_key, 1u32)
                .cmd("TTL")
                .arg(&redis_key)
                .query_async(&mut conn)
                .await?;

            // First hit in a window (or a counter that lost its expiry after
            // a store restart) gets a fresh expiry.
            let now = OffsetDateTime::now_utc().unix_timestamp();
            let resets_at_unix = if count == 1 || ttl < 0 {
                let _: () = conn.expire(&redis_key, window_secs).await?;
                now + window_secs
            } else {
                now + ttl
            };

            Ok::<_, BackendError>(WindowDecision {
                allowed: count <= window.config.max_requests,
                count: count.min(window.config.max_requests),
                resets_at_unix,
            })
        };

        tokio::time::timeout(CALL_TIMEOUT, call)
            .await
            .map_err(|_| BackendError::Timeout)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_window_key_prefixes() {
        // Key layout is a wire contract with other app instances
        let window = NamedWindow {
            key_prefix: format!("ratelimit:{}", RateCategory::Auth.as_str()),
            config: RateCategory::Auth.config(),
        };
        assert_eq!(window.key_prefix, "ratelimit:auth");
        assert_eq!(
            format!("{}:{}", window.key_prefix, "203.0.113.7"),
            "ratelimit:auth:203.0.113.7"
        );
    }
}
