use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use hookcast_core::WebhookRegistration;
use hookcast_registry::{RegistrationCache, RepositoryError, WebhookRepository};

const TTL: Duration = Duration::from_secs(60);

// -- Mock repository ------------------------------------------------------

/// Repository that counts fetches and can be switched into a failing mode.
struct CountingRepository {
    webhooks: Vec<WebhookRegistration>,
    calls: AtomicUsize,
    failing: AtomicBool,
    latency: Duration,
}

impl CountingRepository {
    fn new(webhooks: Vec<WebhookRegistration>) -> Self {
        Self {
            webhooks,
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            latency: Duration::ZERO,
        }
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl WebhookRepository for CountingRepository {
    async fn find_all_active(&self) -> Result<Vec<WebhookRegistration>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection("database unreachable".into()));
        }
        Ok(self.webhooks.clone())
    }
}

fn webhooks() -> Vec<WebhookRegistration> {
    vec![
        WebhookRegistration::new("http://localhost:4815"),
        WebhookRegistration::new("http://localhost:1623"),
    ]
}

fn cache_over(repo: &Arc<CountingRepository>) -> RegistrationCache {
    RegistrationCache::new(Arc::clone(repo) as Arc<dyn WebhookRepository>, TTL)
}

// -- Tests ----------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn fetches_once_per_ttl_window() {
    let repo = Arc::new(CountingRepository::new(webhooks()));
    let cache = cache_over(&repo);

    let first = cache.get_active().await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(repo.call_count(), 1);

    // As it's cached, the repository is not called again inside the window.
    for _ in 0..5 {
        tokio::time::advance(Duration::from_secs(10)).await;
        let again = cache.get_active().await.unwrap();
        assert_eq!(again.len(), 2);
    }
    assert_eq!(repo.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn refetches_exactly_once_after_expiry() {
    let repo = Arc::new(CountingRepository::new(webhooks()));
    let cache = cache_over(&repo);

    cache.get_active().await.unwrap();
    tokio::time::advance(TTL).await;

    cache.get_active().await.unwrap();
    cache.get_active().await.unwrap();
    cache.get_active().await.unwrap();
    assert_eq!(repo.call_count(), 2);

    let stats = cache.stats().await;
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits, 2);
}

#[tokio::test(start_paused = true)]
async fn fetch_failure_propagates_and_keeps_previous_snapshot() {
    let repo = Arc::new(CountingRepository::new(webhooks()));
    let cache = cache_over(&repo);

    cache.get_active().await.unwrap();
    let before = cache.last_snapshot().await.expect("snapshot stored");

    tokio::time::advance(TTL).await;
    repo.set_failing(true);

    let err = cache.get_active().await.unwrap_err();
    assert!(matches!(err, RepositoryError::Connection(_)));

    // The old snapshot is still there, untouched.
    let after = cache.last_snapshot().await.expect("snapshot kept");
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.registrations().len(), 2);
    assert_eq!(cache.stats().await.fetch_errors, 1);

    // The next call retries the fetch instead of serving the stale list.
    repo.set_failing(false);
    let active = cache.get_active().await.unwrap();
    assert_eq!(active.len(), 2);
    assert_eq!(repo.call_count(), 3);

    let refreshed = cache.last_snapshot().await.unwrap();
    assert!(!Arc::ptr_eq(&before, &refreshed));
}

#[tokio::test(start_paused = true)]
async fn failure_without_previous_snapshot() {
    let repo = Arc::new(CountingRepository::new(webhooks()));
    repo.set_failing(true);
    let cache = cache_over(&repo);

    assert!(cache.get_active().await.is_err());
    assert!(cache.last_snapshot().await.is_none());
    assert!(cache.get_active().await.is_err());
    assert_eq!(repo.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_share_one_fetch() {
    let repo = Arc::new(
        CountingRepository::new(webhooks()).with_latency(Duration::from_millis(50)),
    );
    let cache = Arc::new(cache_over(&repo));

    let calls = (0..10).map(|_| {
        let cache = Arc::clone(&cache);
        async move { cache.get_active().await }
    });
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(repo.call_count(), 1);

    // Every caller got the same snapshot.
    let first = results[0].as_ref().unwrap();
    for result in &results {
        assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_share_one_failed_fetch() {
    let latency = Duration::from_secs(1);
    let repo = Arc::new(CountingRepository::new(webhooks()).with_latency(latency));
    repo.set_failing(true);
    let cache = Arc::new(cache_over(&repo));

    let started = tokio::time::Instant::now();
    let calls = (0..5).map(|_| {
        let cache = Arc::clone(&cache);
        async move { cache.get_active().await }
    });
    let results = futures::future::join_all(calls).await;

    // Waiters get the first caller's error instead of each retrying in turn.
    assert!(
        results
            .iter()
            .all(|r| matches!(r, Err(RepositoryError::Connection(_))))
    );
    assert_eq!(repo.call_count(), 1);
    assert!(started.elapsed() < latency * 2);
    assert_eq!(cache.stats().await.fetch_errors, 1);

    // A later call is not served the old error.
    repo.set_failing(false);
    assert_eq!(cache.get_active().await.unwrap().len(), 2);
    assert_eq!(repo.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn registrations_without_url_stay_cached() {
    let repo = Arc::new(CountingRepository::new(vec![
        WebhookRegistration::new("http://localhost:4815"),
        WebhookRegistration::new(""),
    ]));
    let cache = cache_over(&repo);

    let active = cache.get_active().await.unwrap();
    assert_eq!(active.len(), 2);
    assert!(!active[1].has_endpoint());
    assert_eq!(cache.stats().await.cached_registrations, Some(2));
}

#[tokio::test(start_paused = true)]
async fn empty_snapshot_is_cached_too() {
    let repo = Arc::new(CountingRepository::new(Vec::new()));
    let cache = cache_over(&repo);

    assert!(cache.get_active().await.unwrap().is_empty());
    assert!(cache.get_active().await.unwrap().is_empty());
    assert_eq!(repo.call_count(), 1);
    assert_eq!(cache.stats().await.cached_registrations, Some(0));
}
