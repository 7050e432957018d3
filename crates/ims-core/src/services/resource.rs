use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError};
use crate::validation::Validate;

/// List payloads come back either bare or wrapped in `{ "data": [...] }` with paging metadata.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Plain(Vec<T>),
    Paged { data: Vec<T> },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Plain(rows) | Listing::Paged { data: rows } => rows,
        }
    }
}

/// Filter for endpoints listed without parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct NoFilter {}

/// CRUD conventions for one REST collection: `/{path}` and `/{path}/{id}`.
/// Create and update payloads are validated before anything is sent.
pub struct Resource<T> {
    client: ApiClient,
    path: &'static str,
    _rows: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path,
            _rows: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource").field("path", &self.path).finish()
    }
}

impl<T: DeserializeOwned> Resource<T> {
    pub fn new(client: ApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _rows: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, id)
    }

    pub async fn list<F: Serialize + ?Sized>(&self, filter: &F) -> Result<Vec<T>, ApiError> {
        let listing: Listing<T> = self.client.get_with(self.path, filter).await?;
        Ok(listing.into_vec())
    }

    pub async fn get(&self, id: &str) -> Result<T, ApiError> {
        self.client.get(&self.item_path(id)).await
    }

    pub async fn create<B: Serialize + Validate>(&self, body: &B) -> Result<T, ApiError> {
        body.validate()?;
        self.client.post(self.path, body).await
    }

    pub async fn update<B: Serialize + Validate>(&self, id: &str, body: &B) -> Result<T, ApiError> {
        body.validate()?;
        self.client.patch(&self.item_path(id), body).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&self.item_path(id)).await
    }
}
