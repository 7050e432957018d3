use serde::{Deserialize, Serialize};

use crate::validation::{rules, FieldErrors, Validate, ValidationError};

use super::lines::{check_lines, LineItemDto};
use super::sales::check_dates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillDto {
    pub vendor_id: String,
    /// The vendor's own invoice number.
    pub bill_number: String,
    pub bill_date: String,
    pub due_date: String,
    pub lines: Vec<LineItemDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for CreateBillDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        rules::text(&mut errors, "vendorId", &self.vendor_id, 64);
        rules::text(&mut errors, "billNumber", &self.bill_number, 100);
        check_dates(&mut errors, "billDate", &self.bill_date, &self.due_date);
        check_lines(&mut errors, &self.lines);
        rules::optional_text(&mut errors, "notes", self.notes.as_deref(), 2000);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<LineItemDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for UpdateBillDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        if let Some(number) = &self.bill_number {
            rules::text(&mut errors, "billNumber", number, 100);
        }
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

    #[test]
    fn bill_requires_vendor_and_number() {
        let dto = CreateBillDto {
            vendor_id: String::new(),
            bill_number: " ".to_string(),
            bill_date: "2024-05-01".to_string(),
            due_date: "2024-05-31".to_string(),
            lines: vec![LineItemDto::new("Raw material", 10.0, 4.5)],
            notes: None,
        };
        let err = dto.validate().unwrap_err();
        assert!(err.errors().has_field("vendorId"));
        assert!(err.errors().has_field("billNumber"));
        assert_eq!(err.errors().len(), 2);
    }
}
