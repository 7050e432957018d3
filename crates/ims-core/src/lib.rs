pub mod config;
pub mod logging;

pub mod api;
pub mod dto;
pub mod ledger;
pub mod mutation;
pub mod queries;
pub mod query_cache;
pub mod services;
pub mod session;
pub mod validation;
