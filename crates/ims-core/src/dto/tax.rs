//! SST settings and e-Invoice (MyInvois) submission payloads.

use serde::{Deserialize, Serialize};

use crate::validation::{rules, FieldErrors, Validate, ValidationError};

/// Sales tax (5%, 10%) and service tax (6%, 8%) rates, plus exempt.
pub const SST_RATES: [u8; 5] = [0, 5, 6, 8, 10];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaxSettingsDto {
    #[serde(default)]
    pub sst_registered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sst_registration_number: Option<String>,
    #[serde(default)]
    pub sst_rate: u8,
    #[serde(default)]
    pub service_tax_rate: f64,
    #[serde(default)]
    pub einvoice_enabled: bool,
    /// Taxpayer identification number used for MyInvois.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tin: Option<String>,
}

impl Validate for UpdateTaxSettingsDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        match self.sst_registration_number.as_deref() {
            Some(number) => rules::sst_registration_number(&mut errors, "sstRegistrationNumber", number),
            None if self.sst_registered => {
                errors.push("sstRegistrationNumber", "is required when SST registered")
            }
            None => {}
        }
        rules::one_of(&mut errors, "sstRate", &self.sst_rate, &SST_RATES);
        rules::range(&mut errors, "serviceTaxRate", self.service_tax_rate, 0.0, 100.0);
        match self.tin.as_deref() {
            Some(tin) => {
                if rules::not_blank(&mut errors, "tin", tin) {
                    rules::max_len(&mut errors, "tin", tin, 20);
                }
            }
            None if self.einvoice_enabled => errors.push("tin", "is required for e-Invoice"),
            None => {}
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEInvoiceDto {
    pub invoice_id: String,
}

impl Validate for SubmitEInvoiceDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        rules::text(&mut errors, "invoiceId", &self.invoice_id, 64);
        errors.into_result()
    }
}
