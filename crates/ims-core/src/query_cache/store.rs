//! Keyed store, fetch/refetch and invalidation.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::control::FetchControl;
use super::subscription::Listeners;
use super::{CacheEvent, QueryError, QueryKey, Subscription};

/// Type-erased fetcher kept per key so invalidation can refetch in the background.
type Refetcher = Arc<dyn Fn() -> BoxFuture<'static, Result<Value, String>> + Send + Sync>;

/// One cached query.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    /// Last server-confirmed or optimistically-applied value.
    pub data: Option<Value>,
    /// Set by invalidation; cleared when fresh data lands.
    pub stale: bool,
    pub updated_at: Option<Instant>,
    /// Number of fetcher results stored for this key (cancelled runs excluded).
    pub fetch_count: u64,
}

#[derive(Default)]
struct State {
    entries: HashMap<QueryKey, CacheEntry>,
    fetchers: HashMap<QueryKey, Refetcher>,
}

#[derive(Default)]
struct Inner {
    state: Mutex<State>,
    control: FetchControl,
    listeners: Arc<Listeners>,
}

/// Shared handle to the client-side cache. Clones point at the same store.
#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("QueryCache")
            .field("entries", &state.entries.len())
            .field("fetchers", &state.fetchers.len())
            .field("subscribers", &self.inner.listeners.len())
            .finish()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, events: Vec<CacheEvent>) {
        self.inner.listeners.emit(&events);
    }

    /// Register a listener for every cache change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CacheEvent) + Send + Sync + 'static,
    {
        self.inner.listeners.add(Arc::new(listener))
    }

    pub fn get_query_data(&self, key: &QueryKey) -> Option<Value> {
        self.state().entries.get(key).and_then(|e| e.data.clone())
    }

    /// Typed read of a cached value.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>, serde_json::Error> {
        self.get_query_data(key)
            .map(serde_json::from_value)
            .transpose()
    }

    pub fn entry(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.state().entries.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self.state().entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Missing entries count as stale.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.state().entries.get(key).map_or(true, |e| e.stale || e.data.is_none())
    }

    pub fn fetch_count(&self, key: &QueryKey) -> u64 {
        self.state().entries.get(key).map_or(0, |e| e.fetch_count)
    }

    /// Replace the value for `key` and mark it fresh.
    pub fn set_query_data(&self, key: &QueryKey, value: Value) {
        {
            let mut state = self.state();
            let entry = state.entries.entry(key.clone()).or_default();
            entry.data = Some(value);
            entry.stale = false;
            entry.updated_at = Some(Instant::now());
        }
        self.emit(vec![CacheEvent::Updated(key.clone())]);
    }

    pub fn set<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<(), serde_json::Error> {
        self.set_query_data(key, serde_json::to_value(value)?);
        Ok(())
    }

    /// Derive a new value from the current one. Returning `None` leaves the entry untouched.
    /// Returns whether the entry changed.
    pub fn update_query_data<F>(&self, key: &QueryKey, f: F) -> bool
    where
        F: FnOnce(Option<&Value>) -> Option<Value>,
    {
        let changed = {
            let mut state = self.state();
            let current = state.entries.get(key).and_then(|e| e.data.as_ref());
            match f(current) {
                Some(next) => {
                    let entry = state.entries.entry(key.clone()).or_default();
                    entry.data = Some(next);
                    entry.updated_at = Some(Instant::now());
                    true
                }
                None => false,
            }
        };
        if changed {
            self.emit(vec![CacheEvent::Updated(key.clone())]);
        }
        changed
    }

    /// Drop the cached value. The registered fetcher, if any, is kept.
    pub fn remove_query(&self, key: &QueryKey) -> Option<Value> {
        let removed = self.state().entries.remove(key);
        if removed.is_some() {
            self.emit(vec![CacheEvent::Removed(key.clone())]);
        }
        removed.and_then(|e| e.data)
    }

    /// Cancel every fetch in flight for exactly `key`. Returns how many were signalled.
    pub fn cancel_queries(&self, key: &QueryKey) -> usize {
        let cancelled = self.inner.control.cancel(key);
        if cancelled > 0 {
            tracing::debug!(key = %key, cancelled, "cancelled in-flight fetches");
        }
        cancelled
    }

    pub fn in_flight(&self, key: &QueryKey) -> usize {
        self.inner.control.in_flight(key)
    }

    /// Mark every entry under `prefix` stale and refetch the ones with a known fetcher.
    /// Fetches already in flight for a matched key are cancelled. Returns the matched keys.
    pub fn invalidate_queries(&self, prefix: &QueryKey) -> Vec<QueryKey> {
        self.invalidate_many(std::slice::from_ref(prefix))
    }

    /// Like [`invalidate_queries`](Self::invalidate_queries) for several prefixes.
    /// A key matched by more than one prefix is still invalidated and refetched once.
    pub fn invalidate_many(&self, prefixes: &[QueryKey]) -> Vec<QueryKey> {
        let (matched, refetches) = {
            let mut state = self.state();
            let mut matched: BTreeSet<QueryKey> = BTreeSet::new();
            let candidates = state.entries.keys().chain(state.fetchers.keys());
            for key in candidates {
                if prefixes.iter().any(|p| key.starts_with(p)) {
                    matched.insert(key.clone());
                }
            }
            let mut refetches = Vec::new();
            for key in &matched {
                if let Some(entry) = state.entries.get_mut(key) {
                    entry.stale = true;
                }
                if let Some(fetcher) = state.fetchers.get(key) {
                    refetches.push((key.clone(), Arc::clone(fetcher)));
                }
            }
            (matched.into_iter().collect::<Vec<_>>(), refetches)
        };

        // Results of fetches issued before this point must not land on top of the refetch.
        let superseded: usize = matched.iter().map(|key| self.inner.control.cancel(key)).sum();
        if superseded > 0 {
            tracing::debug!(superseded, "cancelled fetches overtaken by invalidation");
        }

        self.emit(matched.iter().cloned().map(CacheEvent::Invalidated).collect());

        if !refetches.is_empty() {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    for (key, fetcher) in refetches {
                        let cache = self.clone();
                        handle.spawn(async move { cache.run_refetch(key, fetcher).await });
                    }
                }
                Err(_) => {
                    tracing::debug!(
                        count = refetches.len(),
                        "no async runtime; invalidated queries will refetch on next read"
                    );
                }
            }
        }
        matched
    }

    async fn run_refetch(&self, key: QueryKey, fetcher: Refetcher) {
        let token = self.inner.control.register(&key);
        let result = fetcher().await;
        self.inner.control.unregister(&key, &token);

        if token.is_cancelled() {
            tracing::debug!(key = %key, "discarding cancelled refetch");
            return;
        }
        match result {
            Ok(value) => self.store_fetched(&key, value),
            Err(e) => tracing::warn!(key = %key, "background refetch failed: {e}"),
        }
    }

    fn store_fetched(&self, key: &QueryKey, value: Value) {
        {
            let mut state = self.state();
            let entry = state.entries.entry(key.clone()).or_default();
            entry.data = Some(value);
            entry.stale = false;
            entry.updated_at = Some(Instant::now());
            entry.fetch_count += 1;
        }
        self.emit(vec![CacheEvent::Updated(key.clone())]);
    }

    /// Return the cached value for `key` if it is fresh; otherwise run `fetcher`,
    /// store its result and return it.
    ///
    /// The fetcher is remembered for the key so later invalidations can refetch
    /// in the background. If the fetch is cancelled while in flight (see
    /// [`cancel_queries`](Self::cancel_queries)) its result is discarded and
    /// `QueryError::Cancelled` is returned.
    pub async fn fetch_query<T, E, F, Fut>(
        &self,
        key: &QueryKey,
        fetcher: F,
    ) -> Result<T, QueryError<E>>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        E: fmt::Display + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let fetcher = Arc::new(fetcher);
        let erased: Refetcher = {
            let fetcher = Arc::clone(&fetcher);
            Arc::new(move || {
                let fut = fetcher();
                async move {
                    let value = fut.await.map_err(|e| e.to_string())?;
                    serde_json::to_value(&value).map_err(|e| e.to_string())
                }
                .boxed()
            })
        };

        let fresh = {
            let mut state = self.state();
            state.fetchers.insert(key.clone(), erased);
            state
                .entries
                .get(key)
                .filter(|e| !e.stale)
                .and_then(|e| e.data.clone())
        };
        if let Some(value) = fresh {
            return Ok(serde_json::from_value(value)?);
        }

        let token = self.inner.control.register(key);
        let result = fetcher().await;
        self.inner.control.unregister(key, &token);

        if token.is_cancelled() {
            tracing::debug!(key = %key, "discarding cancelled fetch");
            return Err(QueryError::Cancelled);
        }
        let value = result.map_err(QueryError::Fetch)?;
        self.store_fetched(key, serde_json::to_value(&value)?);
        Ok(value)
    }
}
