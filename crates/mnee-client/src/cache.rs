//! Time-bounded cache of the system configuration.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use mnee_tokens::{LedgerService, MneeError, SystemConfig};

#[derive(Debug)]
struct CacheEntry {
    value: SystemConfig,
    expires_at: Instant,
}

/// Single-flight cache of [`SystemConfig`].
///
/// A caller that finds the entry missing or stale fetches while holding the
/// lock; concurrent callers wait for it and then see the refreshed value. A
/// failed fetch leaves the previous entry in place, still stale, so the next
/// call retries.
#[derive(Debug)]
pub struct ConfigCache {
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl ConfigCache {
    /// Empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        ConfigCache {
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Current configuration, fetched from `ledger` when the cache is cold,
    /// expired, or `force_refresh` is set.
    pub async fn get<L: LedgerService>(
        &self,
        ledger: &L,
        force_refresh: bool,
    ) -> Result<SystemConfig, MneeError> {
        let mut entry = self.entry.lock().await;
        if !force_refresh {
            if let Some(cached) = entry.as_ref().filter(|e| Instant::now() < e.expires_at) {
                debug!("config cache hit");
                return Ok(cached.value.clone());
            }
        }

        debug!(force_refresh, "refreshing config");
        let value = ledger.config().await?;
        *entry = Some(CacheEntry {
            value: value.clone(),
            expires_at: Instant::now() + self.ttl,
        });
        Ok(value)
    }

    /// Drop the cached entry.
    pub async fn invalidate(&self) {
        *self.entry.lock().await = None;
    }
}
