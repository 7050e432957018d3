//! Optimistic mutations over the query cache.
//!
//! A mutation snapshots the affected cache entry, applies an optional optimistic
//! update, runs the remote operation, restores the snapshot on failure and
//! always invalidates the key afterwards so the cache converges to the server.

mod notifier;
mod optimistic;

pub use notifier::{Notice, Notifier, RecordingNotifier, TracingNotifier};
pub use optimistic::{OptimisticMutation, Updater};
