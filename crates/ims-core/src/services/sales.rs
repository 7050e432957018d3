//! Sales invoices.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Resource;
use crate::api::{ApiClient, ApiError};
use crate::dto::LineItemDto;

pub const INVOICES_PATH: &str = "sales/invoices";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    PartiallyPaid,
    Paid,
    Overdue,
    Void,
}

impl InvoiceStatus {
    /// Only drafts may still be edited or deleted.
    pub fn is_editable(self) -> bool {
        self == InvoiceStatus::Draft
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub customer_id: String,
    pub status: InvoiceStatus,
    pub issue_date: String,
    pub due_date: String,
    #[serde(default)]
    pub lines: Vec<LineItemDto>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub tax_total: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub amount_paid: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Invoice {
    pub fn balance_due(&self) -> f64 {
        self.total - self.amount_paid
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

pub fn invoices(client: &ApiClient) -> Resource<Invoice> {
    Resource::new(client.clone(), INVOICES_PATH)
}

/// Email the invoice to the customer; a draft moves to `SENT`.
pub async fn send(client: &ApiClient, invoice_id: &str, email: Option<&str>) -> Result<Invoice, ApiError> {
    let path = format!("{INVOICES_PATH}/{invoice_id}/send");
    let body = match email {
        Some(email) => json!({ "email": email }),
        None => json!({}),
    };
    client.post(&path, &body).await
}
