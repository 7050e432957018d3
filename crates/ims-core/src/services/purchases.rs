//! Vendor bills.

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::api::ApiClient;
use crate::dto::LineItemDto;

pub const BILLS_PATH: &str = "purchases/bills";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    Draft,
    Open,
    PartiallyPaid,
    Paid,
    Void,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub vendor_id: String,
    pub bill_number: String,
    pub status: BillStatus,
    pub bill_date: String,
    pub due_date: String,
    #[serde(default)]
    pub lines: Vec<LineItemDto>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub amount_paid: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BillStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

pub fn bills(client: &ApiClient) -> Resource<Bill> {
    Resource::new(client.clone(), BILLS_PATH)
}
