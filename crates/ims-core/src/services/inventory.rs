//! Items and stock movements.

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::api::{ApiClient, ApiError};
use crate::dto::{AdjustmentReason, StockAdjustmentDto};
use crate::validation::Validate;

pub const ITEMS_PATH: &str = "inventory/items";
pub const ADJUSTMENTS_PATH: &str = "inventory/adjustments";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub cost_price: f64,
    #[serde(default)]
    pub quantity_on_hand: f64,
    #[serde(default)]
    pub reorder_level: f64,
    #[serde(default)]
    pub sst_rate: u8,
    #[serde(default = "active")]
    pub is_active: bool,
}

fn active() -> bool {
    true
}

impl Item {
    pub fn needs_reorder(&self) -> bool {
        self.reorder_level > 0.0 && self.quantity_on_hand <= self.reorder_level
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: String,
    pub item_id: String,
    pub quantity: f64,
    pub reason: AdjustmentReason,
    #[serde(default)]
    pub quantity_after: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
}

pub fn items(client: &ApiClient) -> Resource<Item> {
    Resource::new(client.clone(), ITEMS_PATH)
}

/// Record a manual stock correction for one item.
pub async fn adjust_stock(
    client: &ApiClient,
    adjustment: &StockAdjustmentDto,
) -> Result<StockMovement, ApiError> {
    adjustment.validate()?;
    client.post(ADJUSTMENTS_PATH, adjustment).await
}
