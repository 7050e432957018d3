use serde::{Deserialize, Serialize};

use crate::validation::{rules, FieldErrors, Validate, ValidationError};

use super::SST_RATES;

const UNITS: [&str; 8] = ["pcs", "box", "kg", "g", "l", "ml", "m", "set"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemDto {
    pub sku: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub selling_price: f64,
    pub cost_price: f64,
    #[serde(default)]
    pub reorder_level: f64,
    #[serde(default)]
    pub sst_rate: u8,
    #[serde(default = "default_true")]
    pub track_inventory: bool,
}

fn default_true() -> bool {
    true
}

impl CreateItemDto {
    pub fn new(sku: impl Into<String>, name: impl Into<String>, selling_price: f64) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            description: None,
            unit: "pcs".to_string(),
            category: None,
            selling_price,
            cost_price: 0.0,
            reorder_level: 0.0,
            sst_rate: 0,
            track_inventory: true,
        }
    }
}

fn check_sku(errors: &mut FieldErrors, sku: &str) {
    if rules::not_blank(errors, "sku", sku) {
        rules::max_len(errors, "sku", sku, 50);
        if !sku
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            errors.push("sku", "may only contain letters, digits, '-' and '_'");
        }
    }
}

fn check_unit(errors: &mut FieldErrors, unit: &str) {
    rules::one_of(errors, "unit", &unit, &UNITS);
}

impl Validate for CreateItemDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        check_sku(&mut errors, &self.sku);
        rules::text(&mut errors, "name", &self.name, 255);
        rules::optional_text(&mut errors, "description", self.description.as_deref(), 2000);
        check_unit(&mut errors, &self.unit);
        rules::optional_text(&mut errors, "category", self.category.as_deref(), 100);
        rules::min(&mut errors, "sellingPrice", self.selling_price, 0.0);
        rules::min(&mut errors, "costPrice", self.cost_price, 0.0);
        rules::min(&mut errors, "reorderLevel", self.reorder_level, 0.0);
        rules::one_of(&mut errors, "sstRate", &self.sst_rate, &SST_RATES);
        errors.into_result()
    }
}

/// Partial update; only present fields are checked and sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reorder_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sst_rate: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Validate for UpdateItemDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            rules::text(&mut errors, "name", name, 255);
        }
        rules::optional_text(&mut errors, "description", self.description.as_deref(), 2000);
        if let Some(unit) = &self.unit {
            check_unit(&mut errors, unit);
        }
        rules::optional_text(&mut errors, "category", self.category.as_deref(), 100);
        if let Some(p) = self.selling_price {
            rules::min(&mut errors, "sellingPrice", p, 0.0);
        }
        if let Some(p) = self.cost_price {
            rules::min(&mut errors, "costPrice", p, 0.0);
        }
        if let Some(r) = self.reorder_level {
            rules::min(&mut errors, "reorderLevel", r, 0.0);
        }
        if let Some(rate) = &self.sst_rate {
            rules::one_of(&mut errors, "sstRate", rate, &SST_RATES);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentReason {
    StockCount,
    Damaged,
    Lost,
    Returned,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustmentDto {
    pub item_id: String,
    /// Signed change in quantity on hand.
    pub quantity: f64,
    pub reason: AdjustmentReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Validate for StockAdjustmentDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        rules::text(&mut errors, "itemId", &self.item_id, 64);
        if self.quantity.is_nan() || self.quantity == 0.0 {
            errors.push("quantity", "must be a non-zero number");
        }
        rules::optional_text(&mut errors, "note", self.note.as_deref(), 500);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_with_defaults_is_valid() {
        assert!(CreateItemDto::new("WID-001", "Widget", 12.5).validate().is_ok());
    }

    #[test]
    fn item_rejects_bad_sku_unit_and_prices() {
        let mut dto = CreateItemDto::new("WID 001", "Widget", -1.0);
        dto.unit = "crate".to_string();
        dto.sst_rate = 7;
        let err = dto.validate().unwrap_err();
        for field in ["sku", "unit", "sellingPrice", "sstRate"] {
            assert!(err.errors().has_field(field), "missing error for {field}");
        }
    }

    #[test]
    fn partial_update_checks_only_present_fields() {
        assert!(UpdateItemDto::default().validate().is_ok());
        let dto = UpdateItemDto {
            cost_price: Some(-5.0),
            ..Default::default()
        };
        let err = dto.validate().unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert!(err.errors().has_field("costPrice"));
    }

    #[test]
    fn zero_adjustment_is_rejected() {
        let dto = StockAdjustmentDto {
            item_id: "item-1".to_string(),
            quantity: 0.0,
            reason: AdjustmentReason::StockCount,
            note: None,
        };
        assert!(dto.validate().unwrap_err().errors().has_field("quantity"));
        assert_eq!(
            serde_json::to_value(AdjustmentReason::StockCount).unwrap(),
            "STOCK_COUNT"
        );
    }
}
