//! Local ledger database (SQLite via sqlx).
//!
//! Holds each organization's chart of accounts and its SST settings. A new
//! organization gets the default Malaysian SME chart exactly once.

pub mod accounts;
pub mod db;
pub mod defaults;
pub mod settings;
pub mod types;

pub use db::LedgerDb;
pub use defaults::{DefaultAccount, DEFAULT_ACCOUNTS};
pub use settings::SettingsError;
pub use types::{LedgerAccount, SeedOutcome, StoredTaxSettings};
