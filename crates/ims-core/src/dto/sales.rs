use serde::{Deserialize, Serialize};

use crate::validation::{rules, FieldErrors, Validate, ValidationError};

use super::lines::{check_lines, LineItemDto};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceDto {
    pub customer_id: String,
    pub issue_date: String,
    pub due_date: String,
    pub lines: Vec<LineItemDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateInvoiceDto {
    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(LineItemDto::net_amount).sum()
    }

    pub fn tax_total(&self) -> f64 {
        self.lines.iter().map(LineItemDto::tax_amount).sum()
    }
}

/// Dates are ISO strings, so lexical order is chronological order.
pub(crate) fn check_dates(errors: &mut FieldErrors, from_field: &str, from: &str, due: &str) {
    let before = errors.len();
    rules::iso_date(errors, from_field, from);
    rules::iso_date(errors, "dueDate", due);
    if errors.len() == before && due < from {
        errors.push("dueDate", format!("must not be before {from_field}"));
    }
}

impl Validate for CreateInvoiceDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        rules::text(&mut errors, "customerId", &self.customer_id, 64);
        check_dates(&mut errors, "issueDate", &self.issue_date, &self.due_date);
        check_lines(&mut errors, &self.lines);
        rules::optional_text(&mut errors, "notes", self.notes.as_deref(), 2000);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<LineItemDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for UpdateInvoiceDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        if let Some(due) = &self.due_date {
            rules::iso_date(&mut errors, "dueDate", due);
        }
        if let Some(lines) = &self.lines {
            check_lines(&mut errors, lines);
        }
        rules::optional_text(&mut errors, "notes", self.notes.as_deref(), 2000);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice() -> CreateInvoiceDto {
        let mut line = LineItemDto::new("Consulting", 3.0, 200.0);
        line.tax_rate = 8;
        CreateInvoiceDto {
            customer_id: "cus_1".to_string(),
            issue_date: "2024-07-01".to_string(),
            due_date: "2024-07-31".to_string(),
            lines: vec![line],
            notes: None,
        }
    }

    #[test]
    fn valid_invoice_and_totals() {
        let dto = invoice();
        assert!(dto.validate().is_ok());
        assert!((dto.subtotal() - 600.0).abs() < 1e-9);
        assert!((dto.tax_total() - 48.0).abs() < 1e-9);
    }

    #[test]
    fn due_before_issue_is_rejected() {
        let mut dto = invoice();
        dto.due_date = "2024-06-30".to_string();
        assert!(dto.validate().unwrap_err().errors().has_field("dueDate"));
    }

    #[test]
    fn empty_lines_rejected() {
        let mut dto = invoice();
        dto.lines.clear();
        assert!(dto.validate().unwrap_err().errors().has_field("lines"));
    }
}
