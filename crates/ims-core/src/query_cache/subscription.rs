//! Observer registry for cache changes.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use super::QueryKey;

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// The entry now holds a new value (fetched, optimistic or restored).
    Updated(QueryKey),
    /// The entry was marked stale and will be refetched.
    Invalidated(QueryKey),
    /// The entry was dropped.
    Removed(QueryKey),
}

impl CacheEvent {
    pub fn key(&self) -> &QueryKey {
        match self {
            CacheEvent::Updated(k) | CacheEvent::Invalidated(k) | CacheEvent::Removed(k) => k,
        }
    }
}

type Listener = Arc<dyn Fn(&CacheEvent) + Send + Sync + 'static>;

#[derive(Default)]
pub(crate) struct Listeners {
    listeners: RwLock<BTreeMap<u64, Listener>>,
    next_id: AtomicU64,
}

impl Listeners {
    pub(crate) fn add(self: &Arc<Self>, listener: Listener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, listener);
        Subscription {
            listeners: Arc::downgrade(self),
            id,
        }
    }

    /// Deliver events. Listeners are cloned out first so no lock is held during callbacks.
    pub(crate) fn emit(&self, events: &[CacheEvent]) {
        if events.is_empty() {
            return;
        }
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        for event in events {
            for listener in &listeners {
                listener(event);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Guard returned by [`QueryCache::subscribe`](super::QueryCache::subscribe).
/// Dropping it unsubscribes.
pub struct Subscription {
    listeners: Weak<Listeners>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .listeners
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
