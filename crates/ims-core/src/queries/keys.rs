//! Cache key factories, one set per REST collection.
//!
//! Keys nest as `[domain, resource]` → `[.., "list"]` → `[.., "list", "<filter>"]`
//! and `[domain, resource]` → `[.., "detail"]` → `[.., "detail", id]`, so
//! invalidating a shorter key reaches every key below it.

use serde::Serialize;

use crate::api::query_pairs;
use crate::query_cache::QueryKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKeys {
    domain: &'static str,
    resource: &'static str,
}

impl ResourceKeys {
    pub const fn new(domain: &'static str, resource: &'static str) -> Self {
        Self { domain, resource }
    }

    pub fn all(&self) -> QueryKey {
        QueryKey::new([self.domain, self.resource])
    }

    /// The unfiltered list, and the prefix of every filtered one.
    pub fn lists(&self) -> QueryKey {
        self.all().with("list")
    }

    /// An empty filter maps to [`lists`](Self::lists) itself; otherwise the
    /// filter's query string becomes the last segment.
    pub fn list<F: Serialize + ?Sized>(&self, filter: &F) -> Result<QueryKey, serde_json::Error> {
        let pairs = query_pairs(filter)?;
        if pairs.is_empty() {
            return Ok(self.lists());
        }
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        Ok(self.lists().with(encoded))
    }

    pub fn details(&self) -> QueryKey {
        self.all().with("detail")
    }

    pub fn detail(&self, id: &str) -> QueryKey {
        self.details().with(id)
    }
}

pub const ITEMS: ResourceKeys = ResourceKeys::new("inventory", "items");
pub const INVOICES: ResourceKeys = ResourceKeys::new("sales", "invoices");
pub const BILLS: ResourceKeys = ResourceKeys::new("purchases", "bills");
pub const ACCOUNTS: ResourceKeys = ResourceKeys::new("accounting", "accounts");
pub const JOURNAL_ENTRIES: ResourceKeys = ResourceKeys::new("accounting", "journal-entries");
pub const CONTACTS: ResourceKeys = ResourceKeys::new("contacts", "contacts");

pub fn tax_settings() -> QueryKey {
    QueryKey::new(["tax", "settings"])
}

pub fn einvoice_submission(id: &str) -> QueryKey {
    QueryKey::new(["tax", "einvoice", id])
}
