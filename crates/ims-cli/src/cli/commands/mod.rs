//! CLI command handlers, one file per area.

mod accounts;
mod einvoice;
mod items;
mod seed;
mod session;
mod sst;
mod tax;

pub use accounts::run_accounts;
pub use einvoice::{run_einvoice_status, run_einvoice_submit};
pub use items::{run_items_add, run_items_delete, run_items_list};
pub use seed::run_seed;
pub use session::{run_login, run_logout, run_session};
pub use sst::run_check_sst;
pub use tax::{run_tax_set, run_tax_show};

use std::sync::Arc;

use anyhow::Result;
use ims_core::api::ApiClient;
use ims_core::config::ImsConfig;
use ims_core::mutation::{Notice, RecordingNotifier};
use ims_core::queries::Queries;
use ims_core::query_cache::QueryCache;
use ims_core::session::SessionStore;

pub(crate) fn api_client(cfg: &ImsConfig) -> Result<ApiClient> {
    Ok(ApiClient::from_config(cfg, SessionStore::open_default()?))
}

/// Queries over a fresh cache; messages are collected and printed by [`print_notices`].
pub(crate) fn queries(cfg: &ImsConfig) -> Result<(Queries, Arc<RecordingNotifier>)> {
    let notifier = Arc::new(RecordingNotifier::new());
    let queries = Queries::new(&api_client(cfg)?, QueryCache::new(), notifier.clone())
        .optimistic_messages(cfg.optimistic_messages());
    Ok((queries, notifier))
}

pub(crate) fn print_notices(notifier: &RecordingNotifier) {
    for notice in notifier.take() {
        match notice {
            Notice::Success(msg) => println!("{msg}"),
            Notice::Error(msg) => eprintln!("{msg}"),
        }
    }
}
