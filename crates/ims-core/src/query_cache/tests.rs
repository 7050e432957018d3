//! Tests for the query cache (keys, store, invalidation, cancellation).

use super::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[test]
fn key_prefix_matching() {
    let list = crate::query_key!["inventory", "items", "list", "page=1"];
    assert!(list.starts_with(&QueryKey::new(["inventory"])));
    assert!(list.starts_with(&QueryKey::new(["inventory", "items"])));
    assert!(!list.starts_with(&QueryKey::new(["inventory", "bills"])));
    assert!(list.starts_with(&crate::query_key![]));
    assert_eq!(list.to_string(), "[inventory, items, list, page=1]");
}

#[test]
fn set_update_remove_notify_subscribers() {
    let cache = QueryCache::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = cache.subscribe(move |ev| sink.lock().unwrap().push(ev.clone()));

    let key = QueryKey::new(["test"]);
    cache.set_query_data(&key, json!({"count": 5}));
    assert!(cache.update_query_data(&key, |old| {
        let n = old?.get("count")?.as_i64()?;
        Some(json!({"count": n + 1}))
    }));
    assert_eq!(cache.get_query_data(&key), Some(json!({"count": 6})));
    assert!(!cache.update_query_data(&key, |_| None));
    assert_eq!(cache.remove_query(&key), Some(json!({"count": 6})));
    assert_eq!(cache.get_query_data(&key), None);

    let events = seen.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            CacheEvent::Updated(key.clone()),
            CacheEvent::Updated(key.clone()),
            CacheEvent::Removed(key),
        ]
    );
}

#[test]
fn dropped_subscription_stops_notifications() {
    let cache = QueryCache::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    let sub = cache.subscribe(move |_| {
        h.fetch_add(1, Ordering::SeqCst);
    });
    let key = QueryKey::new(["a"]);
    cache.set_query_data(&key, json!(1));
    drop(sub);
    cache.set_query_data(&key, json!(2));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fetch_query_serves_fresh_cache_without_refetching() {
    let cache = QueryCache::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let key = QueryKey::new(["inventory", "items"]);

    for _ in 0..3 {
        let calls = Arc::clone(&calls);
        let items: Vec<String> = cache
            .fetch_query(&key, move || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(vec!["widget".to_string()])
                }
            })
            .await
            .unwrap();
        assert_eq!(items, vec!["widget".to_string()]);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.fetch_count(&key), 1);
}

#[tokio::test]
async fn fetch_error_is_returned_and_nothing_cached() {
    let cache = QueryCache::new();
    let key = QueryKey::new(["broken"]);
    let err = cache
        .fetch_query(&key, || async { Err::<i32, _>("boom".to_string()) })
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Fetch(ref m) if m == "boom"));
    assert!(cache.get_query_data(&key).is_none());
}

#[tokio::test]
async fn invalidate_refetches_each_matching_key_once() {
    let cache = QueryCache::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let list = QueryKey::new(["items", "list"]);
    let detail = QueryKey::new(["items", "detail", "1"]);
    let other = QueryKey::new(["bills", "list"]);

    for key in [&list, &detail, &other] {
        let calls = Arc::clone(&calls);
        cache
            .fetch_query(key, move || {
                let calls = Arc::clone(&calls);
                async move { Ok::<_, String>(calls.fetch_add(1, Ordering::SeqCst)) }
            })
            .await
            .unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // Both prefixes cover `list`; it must still refetch only once.
    let matched = cache.invalidate_many(&[QueryKey::new(["items"]), list.clone()]);
    assert_eq!(matched, vec![detail.clone(), list.clone()]);
    assert!(cache.is_stale(&list));
    assert!(!cache.is_stale(&other));

    wait_until(|| cache.fetch_count(&list) == 2 && cache.fetch_count(&detail) == 2).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert_eq!(cache.fetch_count(&other), 1);
    assert!(!cache.is_stale(&list));
}

#[tokio::test]
async fn cancelled_fetch_result_is_discarded() {
    let cache = QueryCache::new();
    let key = QueryKey::new(["slow"]);
    let gate = Arc::new(tokio::sync::Notify::new());

    let fetch = {
        let cache = cache.clone();
        let key = key.clone();
        let gate = Arc::clone(&gate);
        tokio::spawn(async move {
            cache
                .fetch_query(&key, move || {
                    let gate = Arc::clone(&gate);
                    async move {
                        gate.notified().await;
                        Ok::<_, String>(json!("stale server value"))
                    }
                })
                .await
        })
    };

    wait_until(|| cache.in_flight(&key) == 1).await;
    assert_eq!(cache.cancel_queries(&key), 1);
    cache.set_query_data(&key, json!("optimistic"));
    gate.notify_one();

    let result = fetch.await.unwrap();
    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(cache.get_query_data(&key), Some(json!("optimistic")));
    assert_eq!(cache.in_flight(&key), 0);
}

#[test]
fn invalidate_without_runtime_only_marks_stale() {
    let cache = QueryCache::new();
    let key = QueryKey::new(["items"]);
    cache.set_query_data(&key, json!([]));
    let matched = cache.invalidate_queries(&key);
    assert_eq!(matched, vec![key.clone()]);
    assert!(cache.is_stale(&key));
    assert_eq!(cache.get_query_data(&key), Some(json!([])));
}

#[tokio::test]
async fn invalidation_supersedes_fetch_already_in_flight() {
    let cache = QueryCache::new();
    let filtered = QueryKey::new(["items", "list", "page=2"]);
    let gate = Arc::new(tokio::sync::Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let fetch = {
        let cache = cache.clone();
        let key = filtered.clone();
        let gate = Arc::clone(&gate);
        let calls = Arc::clone(&calls);
        tokio::spawn(async move {
            cache
                .fetch_query(&key, move || {
                    let gate = Arc::clone(&gate);
                    let first = calls.fetch_add(1, Ordering::SeqCst) == 0;
                    async move {
                        if first {
                            gate.notified().await;
                            return Ok::<_, String>(json!("before write"));
                        }
                        Ok(json!("after write"))
                    }
                })
                .await
        })
    };
    wait_until(|| cache.in_flight(&filtered) == 1).await;

    let matched = cache.invalidate_queries(&QueryKey::new(["items", "list"]));
    assert_eq!(matched, vec![filtered.clone()]);
    wait_until(|| cache.get_query_data(&filtered) == Some(json!("after write"))).await;

    gate.notify_one();
    assert!(fetch.await.unwrap().unwrap_err().is_cancelled());
    assert_eq!(cache.get_query_data(&filtered), Some(json!("after write")));
    assert!(!cache.is_stale(&filtered));
    assert_eq!(cache.fetch_count(&filtered), 1);
}
