//! Client-side query cache.
//!
//! An explicit keyed store of server data. Each entry is addressed by a
//! [`QueryKey`] (an ordered tuple such as `["inventory", "items", "list", ...]`)
//! and holds the last server-confirmed or optimistically-applied value as JSON.
//!
//! Writes go through a small API (`set`, `update`, `remove`, `invalidate`) and
//! every change is broadcast to subscribers. Fetches register a cooperative
//! cancel token so a newer optimistic write can discard a stale response.

mod control;
mod error;
mod key;
mod store;
mod subscription;

pub use control::CancelToken;
pub use error::QueryError;
pub use key::QueryKey;
pub use store::{CacheEntry, QueryCache};
pub use subscription::{CacheEvent, Subscription};

#[cfg(test)]
mod tests;
