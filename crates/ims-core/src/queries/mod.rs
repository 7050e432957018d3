//! Per-domain query layer: each service call paired with a structured cache key.
//!
//! Reads go through [`QueryCache::fetch_query`]; writes go through
//! [`OptimisticMutation`](crate::mutation::OptimisticMutation) so the cache
//! reflects them before the server answers and is reconciled afterwards.

pub mod keys;
mod placeholder;
mod resource;
mod tax;
pub mod updaters;

use std::sync::Arc;

pub use placeholder::{placeholder_row, PendingRow};
pub use resource::ResourceQueries;
pub use tax::TaxQueries;

use crate::api::ApiClient;
use crate::mutation::Notifier;
use crate::query_cache::QueryCache;
use crate::services::accounting::{self, Account};
use crate::services::contacts::{self, Contact};
use crate::services::inventory::{self, Item};
use crate::services::purchases::{self, Bill};
use crate::services::sales::{self, Invoice};

/// Every domain's queries over one client, cache and notifier.
#[derive(Clone)]
pub struct Queries {
    pub cache: QueryCache,
    pub items: ResourceQueries<Item>,
    pub invoices: ResourceQueries<Invoice>,
    pub bills: ResourceQueries<Bill>,
    pub accounts: ResourceQueries<Account>,
    pub contacts: ResourceQueries<Contact>,
    pub tax: TaxQueries,
}

impl Queries {
    pub fn new(client: &ApiClient, cache: QueryCache, notifier: Arc<dyn Notifier>) -> Self {
        let n = || Arc::clone(&notifier);
        Self {
            items: ResourceQueries::new(cache.clone(), inventory::items(client), keys::ITEMS, "Item", n()),
            invoices: ResourceQueries::new(cache.clone(), sales::invoices(client), keys::INVOICES, "Invoice", n()),
            bills: ResourceQueries::new(cache.clone(), purchases::bills(client), keys::BILLS, "Bill", n()),
            accounts: ResourceQueries::new(cache.clone(), accounting::accounts(client), keys::ACCOUNTS, "Account", n()),
            contacts: ResourceQueries::new(cache.clone(), contacts::contacts(client), keys::CONTACTS, "Contact", n()),
            tax: TaxQueries::new(client.clone(), cache.clone(), n()),
            cache,
        }
    }

    /// Apply the optimistic-toast toggle to every domain.
    pub fn optimistic_messages(mut self, enabled: bool) -> Self {
        self.items = self.items.optimistic_messages(enabled);
        self.invoices = self.invoices.optimistic_messages(enabled);
        self.bills = self.bills.optimistic_messages(enabled);
        self.accounts = self.accounts.optimistic_messages(enabled);
        self.contacts = self.contacts.optimistic_messages(enabled);
        self.tax = self.tax.optimistic_messages(enabled);
        self
    }
}
