use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use super::notifier::{Notifier, TracingNotifier};
use crate::query_cache::{QueryCache, QueryKey};

/// Derives the optimistic cache value from the current one and the mutation input.
pub type Updater<V> = Arc<dyn Fn(&Value, &V) -> Value + Send + Sync>;

type Operation<V, R, E> = Arc<dyn Fn(V) -> BoxFuture<'static, Result<R, E>> + Send + Sync>;

/// A write against the backend whose effect is reflected in the cache before the
/// server confirms it.
///
/// `mutate` follows a fixed lifecycle:
/// 1. cancel in-flight fetches for the key,
/// 2. capture one snapshot of the entry,
/// 3. apply the updater if one is set and a value is cached,
/// 4. surface the success message (if configured) right away,
/// 5. run the operation,
/// 6. on failure restore the snapshot and surface the error message,
/// 7. on every outcome invalidate the key (and any extra keys) once.
///
/// Concurrent mutations on the same key are not reconciled against each other:
/// the last dispatched optimistic write wins until the refetch lands.
pub struct OptimisticMutation<V, R, E> {
    cache: QueryCache,
    key: QueryKey,
    also_invalidate: Vec<QueryKey>,
    operation: Operation<V, R, E>,
    updater: Option<Updater<V>>,
    success_message: Option<String>,
    error_message: Option<String>,
    notifier: Arc<dyn Notifier>,
}

impl<V, R, E> fmt::Debug for OptimisticMutation<V, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimisticMutation")
            .field("key", &self.key)
            .field("also_invalidate", &self.also_invalidate)
            .field("has_updater", &self.updater.is_some())
            .field("success_message", &self.success_message)
            .field("error_message", &self.error_message)
            .finish()
    }
}

impl<V, R, E> OptimisticMutation<V, R, E>
where
    V: Send + 'static,
    R: Send + 'static,
    E: fmt::Display + Send + 'static,
{
    pub fn new<F, Fut>(cache: QueryCache, key: QueryKey, operation: F) -> Self
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        Self {
            cache,
            key,
            also_invalidate: Vec::new(),
            operation: Arc::new(move |vars| operation(vars).boxed()),
            updater: None,
            success_message: None,
            error_message: None,
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_updater<U>(mut self, updater: U) -> Self
    where
        U: Fn(&Value, &V) -> Value + Send + Sync + 'static,
    {
        self.updater = Some(Arc::new(updater));
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Another key (or prefix) to invalidate on settlement, e.g. the detail entry of an updated row.
    pub fn also_invalidate(mut self, key: QueryKey) -> Self {
        self.also_invalidate.push(key);
        self
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Run the mutation. Returns the operation's own result.
    pub async fn mutate(&self, vars: V) -> Result<R, E> {
        self.cache.cancel_queries(&self.key);
        let snapshot = self.cache.get_query_data(&self.key);

        // Armed before the optimistic write so a dropped future still reconciles.
        let settle = Settle {
            cache: &self.cache,
            key: &self.key,
            also: &self.also_invalidate,
        };

        if let (Some(updater), Some(previous)) = (&self.updater, snapshot.as_ref()) {
            self.cache.set_query_data(&self.key, updater(previous, &vars));
        }
        if let Some(message) = &self.success_message {
            self.notifier.success(message);
        }

        let result = (self.operation)(vars).await;

        if let Err(e) = &result {
            match snapshot {
                Some(previous) => self.cache.set_query_data(&self.key, previous),
                None => {
                    self.cache.remove_query(&self.key);
                }
            }
            tracing::warn!(key = %self.key, "mutation failed, cache rolled back: {e}");
            match &self.error_message {
                Some(message) => self.notifier.error(message),
                None => self.notifier.error(&e.to_string()),
            }
        }

        drop(settle);
        result
    }
}

/// Invalidates the mutation's keys exactly once when dropped.
struct Settle<'a> {
    cache: &'a QueryCache,
    key: &'a QueryKey,
    also: &'a [QueryKey],
}

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        let mut keys = Vec::with_capacity(1 + self.also.len());
        keys.push(self.key.clone());
        keys.extend(self.also.iter().cloned());
        self.cache.invalidate_many(&keys);
    }
}
