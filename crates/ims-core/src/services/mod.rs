//! One module per backend domain. Each is a set of functions over [`ApiClient`];
//! the plain CRUD endpoints go through [`Resource`].

pub mod accounting;
pub mod contacts;
pub mod inventory;
pub mod purchases;
mod resource;
pub mod sales;
pub mod tax;

pub use resource::{Listing, NoFilter, Resource};

#[cfg(test)]
pub(crate) mod testing;
