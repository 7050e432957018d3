//! Cooperative cancellation for in-flight fetches.
//!
//! Every fetch registers a token under its key. `cancel` flips every token for
//! a key; the fetch still runs to completion but its result is discarded.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::QueryKey;

/// Cancel flag shared between the cache and one in-flight fetch.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn same(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Registry of key -> in-flight tokens.
#[derive(Debug, Default)]
pub(crate) struct FetchControl {
    in_flight: Mutex<HashMap<QueryKey, Vec<CancelToken>>>,
}

impl FetchControl {
    /// Register a fetch that is about to start; returns its token.
    pub(crate) fn register(&self, key: &QueryKey) -> CancelToken {
        let token = CancelToken::default();
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.entry(key.clone()).or_default().push(token.clone());
        token
    }

    /// Unregister a fetch once it returned (success, failure or cancelled).
    pub(crate) fn unregister(&self, key: &QueryKey, token: &CancelToken) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(tokens) = in_flight.get_mut(key) {
            tokens.retain(|t| !t.same(token));
            if tokens.is_empty() {
                in_flight.remove(key);
            }
        }
    }

    /// Cancel every fetch in flight for `key`. Returns how many were signalled.
    pub(crate) fn cancel(&self, key: &QueryKey) -> usize {
        let in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        match in_flight.get(key) {
            Some(tokens) => {
                tokens.iter().for_each(CancelToken::cancel);
                tokens.len()
            }
            None => 0,
        }
    }

    pub(crate) fn in_flight(&self, key: &QueryKey) -> usize {
        let in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.get(key).map_or(0, Vec::len)
    }
}
