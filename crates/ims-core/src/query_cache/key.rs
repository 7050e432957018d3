use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured identifier of a cached query.
///
/// Keys are compared segment by segment; a key "belongs" to every prefix of
/// itself, which is what targeted invalidation relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Append one segment, returning the extended key.
    pub fn with(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `prefix` matches the leading segments of this key.
    /// The empty key is a prefix of everything.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl From<&[&str]> for QueryKey {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments.iter().copied())
    }
}

/// Build a [`QueryKey`] from any `ToString` segments: `query_key!["items", "detail", id]`.
#[macro_export]
macro_rules! query_key {
    ($($segment:expr),* $(,)?) => {
        $crate::query_cache::QueryKey::from_segments(
            vec![$(::std::string::ToString::to_string(&$segment)),*]
        )
    };
}
