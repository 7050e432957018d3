//! Customers and vendors.

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::api::ApiClient;
use crate::dto::ContactKind;

pub const CONTACTS_PATH: &str = "contacts";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContactKind,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tin: Option<String>,
    #[serde(default)]
    pub brn: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub payment_terms_days: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFilter {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ContactKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

pub fn contacts(client: &ApiClient) -> Resource<Contact> {
    Resource::new(client.clone(), CONTACTS_PATH)
}
