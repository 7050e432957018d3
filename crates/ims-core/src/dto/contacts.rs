use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::{rules, FieldErrors, Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactKind {
    Customer,
    Vendor,
    Both,
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContactKind::Customer => "customer",
            ContactKind::Vendor => "vendor",
            ContactKind::Both => "both",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactDto {
    #[serde(rename = "type")]
    pub kind: ContactKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Tax identification number (needed on e-Invoices).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tin: Option<String>,
    /// Business registration number (SSM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub payment_terms_days: u16,
}

impl CreateContactDto {
    pub fn new(kind: ContactKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            email: None,
            phone: None,
            tin: None,
            brn: None,
            address: None,
            payment_terms_days: 30,
        }
    }
}

fn check_optional_contact_fields(
    errors: &mut FieldErrors,
    email: Option<&str>,
    phone: Option<&str>,
    tin: Option<&str>,
    brn: Option<&str>,
    address: Option<&str>,
) {
    if let Some(email) = email {
        rules::email(errors, "email", email);
    }
    if let Some(phone) = phone {
        rules::phone(errors, "phone", phone);
    }
    rules::optional_text(errors, "tin", tin, 20);
    rules::optional_text(errors, "brn", brn, 30);
    rules::optional_text(errors, "address", address, 500);
}

impl Validate for CreateContactDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        rules::text(&mut errors, "name", &self.name, 255);
        check_optional_contact_fields(
            &mut errors,
            self.email.as_deref(),
            self.phone.as_deref(),
            self.tin.as_deref(),
            self.brn.as_deref(),
            self.address.as_deref(),
        );
        if self.payment_terms_days > 365 {
            errors.push("paymentTermsDays", "must be between 0 and 365");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms_days: Option<u16>,
}

impl Validate for UpdateContactDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            rules::text(&mut errors, "name", name, 255);
        }
        check_optional_contact_fields(
            &mut errors,
            self.email.as_deref(),
            self.phone.as_deref(),
            self.tin.as_deref(),
            self.brn.as_deref(),
            self.address.as_deref(),
        );
        if self.payment_terms_days.is_some_and(|d| d > 365) {
            errors.push("paymentTermsDays", "must be between 0 and 365");
        }
        errors.into_result()
    }
}
