use thiserror::Error;

/// Error returned by [`QueryCache::fetch_query`](super::QueryCache::fetch_query).
#[derive(Debug, Error)]
pub enum QueryError<E> {
    /// The fetcher itself failed.
    #[error("{0}")]
    Fetch(E),
    /// A newer write cancelled this fetch; its result was discarded.
    #[error("query was cancelled")]
    Cancelled,
    /// The cached value could not be converted to or from the requested type.
    #[error("cached value has unexpected shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl<E> QueryError<E> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, QueryError::Cancelled)
    }
}
