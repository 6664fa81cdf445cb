use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hookcast_core::WebhookRegistration;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::RepositoryError;
use crate::repository::WebhookRepository;

/// Default lifetime of a registration snapshot.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// An immutable snapshot of the active registrations and the instant it was
/// fetched.
///
/// Entries are never mutated; a refresh swaps in a new `Arc<CacheEntry>`, so
/// a reader always sees a list together with its own timestamp.
#[derive(Debug)]
pub struct CacheEntry {
    registrations: Arc<[WebhookRegistration]>,
    fetched_at: Instant,
}

impl CacheEntry {
    fn new(registrations: Vec<WebhookRegistration>) -> Self {
        Self {
            registrations: registrations.into(),
            fetched_at: Instant::now(),
        }
    }

    pub fn registrations(&self) -> Arc<[WebhookRegistration]> {
        Arc::clone(&self.registrations)
    }

    pub fn fetched_at(&self) -> Instant {
        self.fetched_at
    }

    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// Returns `true` while the entry is younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// Point-in-time counters of a [`RegistrationCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Calls served from a fresh snapshot.
    pub hits: u64,
    /// Calls that went to the repository.
    pub misses: u64,
    /// Repository fetches that failed.
    pub fetch_errors: u64,
    /// Size of the last stored snapshot, if any.
    pub cached_registrations: Option<usize>,
}

/// TTL cache of the active webhook registrations.
///
/// At most one repository fetch happens per TTL window: callers that find
/// the snapshot expired queue on a refresh lock, and all but the first reuse
/// the outcome of the first one: the snapshot it stored, or the error it got.
/// A failed fetch propagates to every caller that waited on it and leaves the
/// previous snapshot in place.
pub struct RegistrationCache {
    repository: Arc<dyn WebhookRepository>,
    ttl: Duration,
    entry: RwLock<Option<Arc<CacheEntry>>>,
    refresh: Mutex<RefreshState>,
    /// Completed repository fetches, bumped while the refresh lock is held.
    fetches: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    fetch_errors: AtomicU64,
}

/// Outcome of the last completed fetch, guarded by the refresh lock.
#[derive(Default)]
struct RefreshState {
    last_error: Option<RepositoryError>,
}

impl RegistrationCache {
    pub fn new(repository: Arc<dyn WebhookRepository>, ttl: Duration) -> Self {
        Self {
            repository,
            ttl,
            entry: RwLock::new(None),
            refresh: Mutex::new(RefreshState::default()),
            fetches: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            fetch_errors: AtomicU64::new(0),
        }
    }

    /// Create a cache with [`DEFAULT_CACHE_TTL`].
    pub fn with_default_ttl(repository: Arc<dyn WebhookRepository>) -> Self {
        Self::new(repository, DEFAULT_CACHE_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the active registrations, fetching them if the snapshot is
    /// missing or older than the TTL.
    pub async fn get_active(&self) -> Result<Arc<[WebhookRegistration]>, RepositoryError> {
        if let Some(entry) = self.fresh_entry().await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(entry.registrations());
        }

        let seen = self.fetches.load(Ordering::Acquire);
        let mut refresh = self.refresh.lock().await;

        // Another caller may have refreshed while we waited for the lock.
        if let Some(entry) = self.fresh_entry().await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(entry.registrations());
        }

        // ...or failed to. Share its error instead of queueing another fetch.
        if self.fetches.load(Ordering::Acquire) != seen
            && let Some(ref err) = refresh.last_error
        {
            return Err(err.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = self.repository.find_all_active().await;
        self.fetches.fetch_add(1, Ordering::Release);

        match result {
            Ok(registrations) => {
                refresh.last_error = None;
                let without_url = registrations
                    .iter()
                    .filter(|webhook| !webhook.has_endpoint())
                    .count();
                if without_url > 0 {
                    warn!(
                        count = without_url,
                        "active webhooks without url will be skipped"
                    );
                }

                let entry = Arc::new(CacheEntry::new(registrations));
                debug!(
                    registrations = entry.registrations.len(),
                    ttl_secs = self.ttl.as_secs(),
                    "refreshed webhook registration cache"
                );
                *self.entry.write().await = Some(Arc::clone(&entry));
                Ok(entry.registrations())
            }
            Err(e) => {
                self.fetch_errors.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "failed to fetch active webhooks");
                refresh.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// The last stored snapshot, fresh or not.
    pub async fn last_snapshot(&self) -> Option<Arc<CacheEntry>> {
        self.entry.read().await.clone()
    }

    /// Drop the current snapshot so the next call fetches again.
    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetch_errors: self.fetch_errors.load(Ordering::Relaxed),
            cached_registrations: self
                .entry
                .read()
                .await
                .as_ref()
                .map(|entry| entry.registrations.len()),
        }
    }

    async fn fresh_entry(&self) -> Option<Arc<CacheEntry>> {
        self.entry
            .read()
            .await
            .as_ref()
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(Arc::clone)
    }
}

impl std::fmt::Debug for RegistrationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryWebhookRepository;

    #[tokio::test(start_paused = true)]
    async fn entry_freshness_follows_ttl() {
        let created = Instant::now();
        let entry = CacheEntry::new(vec![WebhookRegistration::new("a")]);
        assert_eq!(entry.fetched_at(), created);
        assert!(entry.is_fresh(Duration::from_secs(10)));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(!entry.is_fresh(Duration::from_secs(10)));
        assert_eq!(entry.age(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn serves_repository_contents() {
        let repo = Arc::new(MemoryWebhookRepository::with_webhooks(vec![
            WebhookRegistration::new("a"),
            WebhookRegistration::new("b"),
        ]));
        let cache = RegistrationCache::with_default_ttl(repo);

        let active = cache.get_active().await.unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].url, "a");
        assert_eq!(cache.ttl(), DEFAULT_CACHE_TTL);
    }

    #[tokio::test]
    async fn snapshot_is_shared_not_copied() {
        let repo = Arc::new(MemoryWebhookRepository::with_webhooks(vec![
            WebhookRegistration::new("a"),
        ]));
        let cache = RegistrationCache::with_default_ttl(repo);

        let first = cache.get_active().await.unwrap();
        let second = cache.get_active().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let repo = Arc::new(MemoryWebhookRepository::with_webhooks(vec![
            WebhookRegistration::new("a"),
        ]));
        let cache = RegistrationCache::with_default_ttl(Arc::clone(&repo) as _);

        assert_eq!(cache.get_active().await.unwrap().len(), 1);
        repo.insert(WebhookRegistration::new("b")).await;
        assert_eq!(cache.get_active().await.unwrap().len(), 1);

        cache.invalidate().await;
        assert!(cache.last_snapshot().await.is_none());
        assert_eq!(cache.get_active().await.unwrap().len(), 2);

        let stats = cache.stats().await;
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.cached_registrations, Some(2));
    }
}
