use serde::{Deserialize, Serialize};

use crate::dto::AccountType;

/// One row of an organization's chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAccount {
    pub id: i64,
    pub organization_id: String,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub is_system: bool,
    pub created_at: i64,
}

/// Result of seeding the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedOutcome {
    /// Accounts inserted; 0 when the organization already had any.
    pub created: usize,
}

/// Persisted SST settings of one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTaxSettings {
    pub organization_id: String,
    pub sst_registered: bool,
    pub sst_registration_number: Option<String>,
    pub sst_rate: u8,
    pub service_tax_rate: f64,
    pub einvoice_enabled: bool,
    pub tin: Option<String>,
    pub updated_at: i64,
}
