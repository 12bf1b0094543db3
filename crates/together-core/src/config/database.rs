//! Database settings for the membership store.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// PostgreSQL settings for the membership store.
///
/// Every membership operation holds one pooled connection for the length
/// of its transaction. Joins and leaves on the same session queue behind
/// that session's row lock, so the lock wait is bounded separately from
/// the wait for a free connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Upper bound on concurrently running membership transactions.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Connections kept open while idle.
    #[serde(default = "default_min_idle")]
    pub min_idle: u32,
    /// Seconds an operation waits for a free connection.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
    /// Milliseconds a join or leave waits for a session row lock before
    /// failing. `0` waits indefinitely.
    #[serde(default = "default_lock_timeout")]
    pub lock_timeout_ms: u64,
}

impl DatabaseConfig {
    /// Wait for a pooled connection.
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }

    /// Wait for a session row lock, if bounded.
    pub fn lock_timeout(&self) -> Option<Duration> {
        (self.lock_timeout_ms > 0).then(|| Duration::from_millis(self.lock_timeout_ms))
    }
}

fn default_pool_size() -> u32 {
    10
}

fn default_min_idle() -> u32 {
    1
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_lock_timeout() -> u64 {
    3_000
}
