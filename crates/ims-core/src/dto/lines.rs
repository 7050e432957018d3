//! Line items shared by invoices and bills.

use serde::{Deserialize, Serialize};

use crate::validation::{rules, FieldErrors};

use super::SST_RATES;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// SST percentage applied to this line.
    #[serde(default)]
    pub tax_rate: u8,
    #[serde(default)]
    pub discount_pct: f64,
}

impl LineItemDto {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            item_id: None,
            description: description.into(),
            quantity,
            unit_price,
            tax_rate: 0,
            discount_pct: 0.0,
        }
    }

    /// Net amount after discount, before tax.
    pub fn net_amount(&self) -> f64 {
        self.quantity * self.unit_price * (1.0 - self.discount_pct / 100.0)
    }

    pub fn tax_amount(&self) -> f64 {
        self.net_amount() * f64::from(self.tax_rate) / 100.0
    }

    pub(crate) fn check(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        rules::text(&mut errors, "description", &self.description, 500);
        if self.quantity.is_nan() || self.quantity <= 0.0 {
            errors.push("quantity", "must be greater than 0");
        }
        rules::min(&mut errors, "unitPrice", self.unit_price, 0.0);
        rules::one_of(&mut errors, "taxRate", &self.tax_rate, &SST_RATES);
        rules::range(&mut errors, "discountPct", self.discount_pct, 0.0, 100.0);
        errors
    }
}

/// Validate a non-empty list of lines, nesting errors as `lines[i].field`.
pub(crate) fn check_lines(errors: &mut FieldErrors, lines: &[LineItemDto]) {
    if lines.is_empty() {
        errors.push("lines", "must contain at least one line");
    }
    for (i, line) in lines.iter().enumerate() {
        errors.extend_prefixed(&format!("lines[{i}]"), line.check());
    }
}
