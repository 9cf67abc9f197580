//! In-process fallback rate-limit backend
//!
//! Used when no durable store is configured. Counters live in one
//! mutex-guarded map keyed by (category, client key), the same shape as the
//! durable backend, so the two are behaviorally interchangeable. A background
//! sweep removes entries past their reset time every five minutes; it runs
//! for the life of the backend and is aborted when the backend is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use time::OffsetDateTime;

use super::categories::{RateCategory, WindowConfig};
use super::WindowDecision;

/// Sweep interval for expired windows
const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

struct WindowEntry {
    count: u32,
    resets_at_unix: i64,
}

struct Shared {
    windows: Mutex<HashMap<(RateCategory, String), WindowEntry>>,
}

/// Fallback fixed-window rate limiter
pub struct MemoryBackend {
    shared: Arc<Shared>,
    sweeper: tokio::task::JoinHandle<()>,
}

impl MemoryBackend {
    /// Create the backend and start its sweep task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        let shared = Arc::new(Shared {
            windows: Mutex::new(HashMap::new()),
        });

        let sweep_target = Arc::downgrade(&shared);
        let sweeper = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(shared) = sweep_target.upgrade() else {
                    break;
                };
                let now = OffsetDateTime::now_utc().unix_timestamp();
                let mut windows = shared
                    .windows
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                windows.retain(|_, entry| entry.resets_at_unix > now);
            }
        });

        Self { shared, sweeper }
    }

    /// Run a fixed-window check for (category, key).
    pub fn check(&self, category: RateCategory, key: &str, config: &WindowConfig) -> WindowDecision {
        self.check_at(
            category,
            key,
            config,
            OffsetDateTime::now_utc().unix_timestamp(),
        )
    }

    /// Fixed-window check against an explicit clock. Split out so tests can
    /// advance time instead of sleeping.
    fn check_at(
        &self,
        category: RateCategory,
        key: &str,
        config: &WindowConfig,
        now: i64,
    ) -> WindowDecision {
        let mut windows = self
            .shared
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let entry = windows
            .entry((category, key.to_string()))
            .or_insert(WindowEntry {
                count: 0,
                resets_at_unix: 0,
            });

        // Fresh entry or expired window: start over with this request counted.
        if entry.resets_at_unix <= now {
            entry.count = 1;
            entry.resets_at_unix = now + config.window.as_secs() as i64;
            return WindowDecision {
                allowed: true,
                count: 1,
                resets_at_unix: entry.resets_at_unix,
            };
        }

        if entry.count < config.max_requests {
            entry.count += 1;
            return WindowDecision {
                allowed: true,
                count: entry.count,
                resets_at_unix: entry.resets_at_unix,
            };
        }

        WindowDecision {
            allowed: false,
            count: entry.count,
            resets_at_unix: entry.resets_at_unix,
        }
    }

    /// Number of live window entries (sweep observability).
    pub fn entry_count(&self) -> usize {
        self.shared
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    #[cfg(test)]
    fn sweep_now(&self, now: i64) {
        let mut windows = self
            .shared
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        windows.retain(|_, entry| entry.resets_at_unix > now);
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MemoryBackend {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}
