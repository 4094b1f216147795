//! Single-flight cache population.
//!
//! Per key the coordinator is in one of three implicit states:
//! - cached: a cache path exists, nothing to do
//! - fetching: another caller leads a fetch, wait for its outcome
//! - idle: claim the key and lead the fetch
//!
//! The claim is an insert-if-absent under the in-flight lock. The fetch runs
//! on a detached task so dropping the leader's future never abandons work
//! that waiters (and later callers) rely on. The in-flight entry is removed
//! by [`FlightGuard`] on every exit path before waiters are released.

use std::{
    any::type_name_of_val,
    collections::HashMap,
    fmt,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
};

use iconvault_model::{ApiBase, IconKey, Tintability};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    cache::IconCacheStore,
    classify::classify,
    error::{IconError, Result},
    transport::IconTransport,
};

/// Body the icon API serves (often with a 200) for unknown icons.
pub const NOT_FOUND_BODY: &str = "404";

type FlightOutcome = Result<Tintability>;
type InFlightMap = HashMap<String, watch::Receiver<Option<FlightOutcome>>>;

/// Snapshot of single-flight counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlightStats {
    /// Callers that claimed a key and ran the fetch.
    pub leaders: u64,
    /// Callers that found a fetch in progress and waited on it.
    pub waiters: u64,
    /// Fetch attempts that ended without a cache entry.
    pub failures: u64,
}

#[derive(Default)]
struct FlightCounters {
    leaders: AtomicU64,
    waiters: AtomicU64,
    failures: AtomicU64,
}

#[derive(Clone)]
pub struct FetchCoordinator {
    store: IconCacheStore,
    transport: Arc<dyn IconTransport>,
    api_base: ApiBase,
    // Keyed by the canonical plain cache path.
    in_flight: Arc<Mutex<InFlightMap>>,
    counters: Arc<FlightCounters>,
}

impl fmt::Debug for FetchCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("FetchCoordinator")
            .field("store", &self.store)
            .field("transport", &type_name_of_val(self.transport.as_ref()))
            .field("api_base", &self.api_base.to_string())
            .field("in_flight_requests", &self.in_flight_count())
            .field("sf_leaders", &stats.leaders)
            .field("sf_waiters", &stats.waiters)
            .field("sf_failures", &stats.failures)
            .finish()
    }
}

enum Claim {
    Lead(FlightGuard),
    Wait(watch::Receiver<Option<FlightOutcome>>),
}

/// Membership of one key in the in-flight map.
///
/// Dropping the guard removes the key first and only then publishes the
/// outcome, so a released waiter never still sees the key as in flight. If
/// the leader dies without an outcome the sender is dropped and waiters
/// fall back to checking the cache.
struct FlightGuard {
    slot: String,
    in_flight: Arc<Mutex<InFlightMap>>,
    tx: watch::Sender<Option<FlightOutcome>>,
    outcome: Option<FlightOutcome>,
}

impl FlightGuard {
    fn finish(mut self, outcome: FlightOutcome) {
        self.outcome = Some(outcome);
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        lock_map(&self.in_flight).remove(&self.slot);
        if let Some(outcome) = self.outcome.take() {
            self.tx.send_replace(Some(outcome));
        }
    }
}

fn lock_map(map: &Mutex<InFlightMap>) -> MutexGuard<'_, InFlightMap> {
    map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FetchCoordinator {
    pub fn new(
        store: IconCacheStore,
        transport: Arc<dyn IconTransport>,
        api_base: ApiBase,
    ) -> Self {
        Self {
            store,
            transport,
            api_base,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            counters: Arc::new(FlightCounters::default()),
        }
    }

    pub fn store(&self) -> &IconCacheStore {
        &self.store
    }

    pub fn api_base(&self) -> &ApiBase {
        &self.api_base
    }

    pub fn stats(&self) -> FlightStats {
        FlightStats {
            leaders: self.counters.leaders.load(Ordering::Relaxed),
            waiters: self.counters.waiters.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    pub fn in_flight_count(&self) -> usize {
        lock_map(&self.in_flight).len()
    }

    pub fn is_in_flight(&self, key: &IconKey) -> bool {
        lock_map(&self.in_flight).contains_key(&key.cache_path())
    }

    /// Make sure `key` is cached, fetching it at most once across all
    /// concurrent callers. Returns the cached variant.
    ///
    /// Every caller that joined the same attempt gets the same outcome.
    /// Failures leave no cache entry and release the key, so the next call
    /// retries.
    pub async fn ensure_cached(&self, key: &IconKey) -> Result<Tintability> {
        if let Some(tintability) = self.store.cached_variant(key).await {
            return Ok(tintability);
        }

        match self.claim(key) {
            Claim::Wait(rx) => self.wait_for_leader(key, rx).await,
            Claim::Lead(guard) => {
                let this = self.clone();
                let key = key.clone();
                let task = tokio::spawn(async move { this.lead(key, guard).await });
                task.await.map_err(|err| {
                    IconError::Internal(format!("icon fetch task failed: {err}"))
                })?
            }
        }
    }

    fn claim(&self, key: &IconKey) -> Claim {
        let slot = key.cache_path();
        let mut map = lock_map(&self.in_flight);

        if let Some(rx) = map.get(&slot) {
            let waiters = self.counters.waiters.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(icon = %key, waiters, "singleflight wait");
            return Claim::Wait(rx.clone());
        }

        let (tx, rx) = watch::channel(None);
        map.insert(slot.clone(), rx);
        let leaders = self.counters.leaders.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(icon = %key, leaders, "singleflight lead");

        Claim::Lead(FlightGuard {
            slot,
            in_flight: Arc::clone(&self.in_flight),
            tx,
            outcome: None,
        })
    }

    async fn wait_for_leader(
        &self,
        key: &IconKey,
        mut rx: watch::Receiver<Option<FlightOutcome>>,
    ) -> Result<Tintability> {
        let published = match rx.wait_for(|outcome| outcome.is_some()).await {
            Ok(outcome) => outcome.clone(),
            Err(_) => None,
        };

        match published {
            Some(outcome) => outcome,
            // Leader vanished without reporting; the cache is authoritative.
            None => self.store.cached_variant(key).await.ok_or_else(|| {
                IconError::Internal(format!(
                    "fetch for {key} ended without an outcome"
                ))
            }),
        }
    }

    async fn lead(self, key: IconKey, guard: FlightGuard) -> Result<Tintability> {
        // A previous leader may have finished between our cache check and
        // the claim.
        let outcome = match self.store.cached_variant(&key).await {
            Some(tintability) => Ok(tintability),
            None => self.fetch_once(&key).await,
        };

        if let Err(err) = &outcome {
            self.counters.failures.fetch_add(1, Ordering::Relaxed);
            warn!(icon = %key, error = %err, "icon fetch failed");
        }

        guard.finish(outcome.clone());
        debug!(icon = %key, "singleflight complete");
        outcome
    }

    /// One GET, classify, write. No retries.
    async fn fetch_once(&self, key: &IconKey) -> Result<Tintability> {
        let url = key.remote_url(&self.api_base);
        info!(icon = %key, %url, "cache miss for icon, fetching from api");

        let response = self.transport.get(&url).await.map_err(|err| {
            IconError::FetchTransport {
                url: url.to_string(),
                message: err.to_string(),
            }
        })?;

        // The api rarely uses a 404 status for unknown icons; it answers
        // with a literal "404" document instead.
        if response.status == 404 || response.body == NOT_FOUND_BODY {
            return Err(IconError::FetchNotFound {
                key: key.to_string(),
            });
        }
        if !response.is_success() {
            return Err(IconError::FetchTransport {
                url: url.to_string(),
                message: format!("unexpected status {}", response.status),
            });
        }

        let tintability = classify(&response.body);
        self.store.persist(key, tintability, &response.body).await?;
        Ok(tintability)
    }
}
