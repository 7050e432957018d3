use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::keys::ResourceKeys;
use super::placeholder::{placeholder_row, PendingRow};
use super::updaters::{append_row, merge_row, remove_row};
use crate::api::ApiError;
use crate::mutation::{Notifier, OptimisticMutation};
use crate::query_cache::{QueryCache, QueryError};
use crate::services::Resource;
use crate::validation::Validate;

/// Cached reads and optimistic writes for one REST collection.
///
/// Writes target the unfiltered list entry; settling invalidates that key,
/// which as a prefix also reaches every filtered list.
pub struct ResourceQueries<T> {
    cache: QueryCache,
    resource: Resource<T>,
    keys: ResourceKeys,
    /// Singular, human-readable name used in messages ("Item", "Invoice").
    label: &'static str,
    notifier: Arc<dyn Notifier>,
    optimistic_messages: bool,
}

impl<T> Clone for ResourceQueries<T> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            resource: self.resource.clone(),
            keys: self.keys,
            label: self.label,
            notifier: Arc::clone(&self.notifier),
            optimistic_messages: self.optimistic_messages,
        }
    }
}

impl<T> ResourceQueries<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(
        cache: QueryCache,
        resource: Resource<T>,
        keys: ResourceKeys,
        label: &'static str,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            cache,
            resource,
            keys,
            label,
            notifier,
            optimistic_messages: true,
        }
    }

    /// Whether the success message is shown before the server confirms.
    pub fn optimistic_messages(mut self, enabled: bool) -> Self {
        self.optimistic_messages = enabled;
        self
    }

    pub fn keys(&self) -> ResourceKeys {
        self.keys
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn list<F>(&self, filter: F) -> Result<Vec<T>, QueryError<ApiError>>
    where
        F: Serialize + Send + Sync + 'static,
    {
        let key = self.keys.list(&filter)?;
        let resource = self.resource.clone();
        let filter = Arc::new(filter);
        self.cache
            .fetch_query(&key, move || {
                let resource = resource.clone();
                let filter = Arc::clone(&filter);
                async move { resource.list(&*filter).await }
            })
            .await
    }

    pub async fn detail(&self, id: &str) -> Result<T, QueryError<ApiError>> {
        let key = self.keys.detail(id);
        let resource = self.resource.clone();
        let id = id.to_string();
        self.cache
            .fetch_query(&key, move || {
                let resource = resource.clone();
                let id = id.clone();
                async move { resource.get(&id).await }
            })
            .await
    }

    fn mutation<V, R, F, Fut>(&self, verb: &str, done: &str, operation: F) -> OptimisticMutation<V, R, ApiError>
    where
        V: Send + 'static,
        R: Send + 'static,
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<R, ApiError>> + Send + 'static,
    {
        let mut mutation = OptimisticMutation::new(self.cache.clone(), self.keys.lists(), operation)
            .error_message(format!("Failed to {verb} {}", self.label.to_lowercase()))
            .notifier(Arc::clone(&self.notifier));
        if self.optimistic_messages {
            mutation = mutation.success_message(format!("{} {done} successfully", self.label));
        }
        mutation
    }

    /// Appends a placeholder row under a temporary id until the refetch lands.
    /// Payloads that cannot form a row of `T` leave the cached list as it was.
    pub async fn create<B>(&self, body: B) -> Result<T, ApiError>
    where
        B: Serialize + Validate + Send + Sync + 'static,
        T: PendingRow,
    {
        body.validate()?;
        let resource = self.resource.clone();
        self.mutation("create", "created", move |body: B| {
            let resource = resource.clone();
            async move { resource.create(&body).await }
        })
        .with_updater(|list, body: &B| {
            match serde_json::to_value(body).ok().and_then(placeholder_row::<T>) {
                Some(row) => append_row(list, row),
                None => list.clone(),
            }
        })
        .mutate(body)
        .await
    }

    /// Merges the payload into the cached row; the detail entry is invalidated too.
    pub async fn update<B>(&self, id: &str, body: B) -> Result<T, ApiError>
    where
        B: Serialize + Validate + Send + Sync + 'static,
    {
        body.validate()?;
        let resource = self.resource.clone();
        let target = id.to_string();
        let row_id = target.clone();
        self.mutation("update", "updated", move |body: B| {
            let resource = resource.clone();
            let id = target.clone();
            async move { resource.update(&id, &body).await }
        })
        .with_updater(move |list, body: &B| match serde_json::to_value(body) {
            Ok(patch) => merge_row(list, &row_id, &patch),
            Err(_) => list.clone(),
        })
        .also_invalidate(self.keys.detail(id))
        .mutate(body)
        .await
    }

    /// Removes the row from the cached list and invalidates its detail entry.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let resource = self.resource.clone();
        self.mutation("delete", "deleted", move |id: String| {
            let resource = resource.clone();
            async move { resource.delete(&id).await }
        })
        .with_updater(|list, id: &String| remove_row(list, id))
        .also_invalidate(self.keys.detail(id))
        .mutate(id.to_string())
        .await
    }
}
