//! Replay stores: ledgers of previously accepted nonces.
//!
//! A nonce that exists in the store belongs to a request that was already
//! authenticated; seeing it again means a replay. Entries are kept for the
//! store's retention ttl, which must be at least twice the nonce ttl so a
//! store entry always outlives the nonce's own freshness window
//! (checked by [`crate::auth::Authenticator::new`]).

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::error::AuthResult;

/// Capability interface over a nonce ledger.
///
/// Store I/O may block or involve network round-trips; callers bound it with
/// their own timeout and treat any error as a rejection.
#[async_trait]
pub trait ReplayStore: Send + Sync {
    /// Whether the nonce is already recorded (and its entry unexpired).
    async fn exists(&self, nonce: &str) -> AuthResult<bool>;

    /// Record the nonce. Recording an already-present nonce is a no-op.
    async fn store(&self, nonce: &str) -> AuthResult<()>;

    /// Atomically claim the nonce if it is not already recorded.
    ///
    /// Returns `true` when this call recorded the nonce, `false` when it was
    /// already present. The default implementation composes [`exists`] and
    /// [`store`] and is therefore not atomic: two concurrent calls with the
    /// same nonce may both observe it as absent. Backends with a
    /// check-and-set primitive should override this.
    ///
    /// [`exists`]: ReplayStore::exists
    /// [`store`]: ReplayStore::store
    async fn reserve(&self, nonce: &str) -> AuthResult<bool> {
        if self.exists(nonce).await? {
            return Ok(false);
        }
        self.store(nonce).await?;
        Ok(true)
    }

    /// How long a recorded nonce is retained.
    fn retention_ttl(&self) -> Duration;
}

/// A replay store that records nothing and reports every nonce as unused.
///
/// Only suitable for trusted or offline contexts where replay protection is
/// deliberately disabled. The retention ttl is kept very large so the
/// startup safety check always passes.
#[derive(Debug, Default)]
pub struct NoopReplayStore;

#[async_trait]
impl ReplayStore for NoopReplayStore {
    async fn exists(&self, _nonce: &str) -> AuthResult<bool> {
        Ok(false)
    }

    async fn store(&self, _nonce: &str) -> AuthResult<()> {
        Ok(())
    }

    async fn reserve(&self, _nonce: &str) -> AuthResult<bool> {
        Ok(true)
    }

    fn retention_ttl(&self) -> Duration {
        // 1000 days.
        Duration::from_secs(1000 * 24 * 60 * 60)
    }
}

/// A durable replay store backed by an expiring-key cache.
///
/// Each recorded nonce is inserted as both key and value with the store's
/// retention ttl; `exists` is true while the entry is present and unexpired.
/// The cache is additionally capacity-bounded as a safety net against
/// unbounded growth.
///
/// Keys are the bare nonce text, shared globally across all services.
pub struct CacheReplayStore {
    cache: Cache<String, String>,
    retention: Duration,
}

impl CacheReplayStore {
    /// Create a store retaining nonces for `retention`, holding at most
    /// `max_entries` at a time.
    pub fn new(retention: Duration, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(retention)
            .build();
        Self { cache, retention }
    }

    /// Number of nonces currently recorded (for monitoring).
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReplayStore for CacheReplayStore {
    async fn exists(&self, nonce: &str) -> AuthResult<bool> {
        Ok(self.cache.contains_key(nonce))
    }

    async fn store(&self, nonce: &str) -> AuthResult<()> {
        self.cache.insert(nonce.to_string(), nonce.to_string()).await;
        Ok(())
    }

    async fn reserve(&self, nonce: &str) -> AuthResult<bool> {
        let entry = self
            .cache
            .entry_by_ref(nonce)
            .or_insert_with(async { nonce.to_string() })
            .await;
        Ok(entry.is_fresh())
    }

    fn retention_ttl(&self) -> Duration {
        self.retention
    }
}
