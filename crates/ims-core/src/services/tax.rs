//! SST settings and e-Invoice (MyInvois) submissions.

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError};
use crate::dto::{SubmitEInvoiceDto, UpdateTaxSettingsDto};
use crate::validation::Validate;

pub const SETTINGS_PATH: &str = "tax/settings";
pub const EINVOICE_PATH: &str = "tax/einvoice";

/// Organization tax profile as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSettings {
    #[serde(default)]
    pub sst_registered: bool,
    #[serde(default)]
    pub sst_registration_number: Option<String>,
    #[serde(default)]
    pub sst_rate: u8,
    #[serde(default)]
    pub service_tax_rate: f64,
    #[serde(default)]
    pub einvoice_enabled: bool,
    #[serde(default)]
    pub tin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EInvoiceState {
    Pending,
    Submitted,
    Valid,
    Invalid,
    Cancelled,
}

impl EInvoiceState {
    /// No further status changes are expected from MyInvois.
    pub fn is_final(self) -> bool {
        matches!(
            self,
            EInvoiceState::Valid | EInvoiceState::Invalid | EInvoiceState::Cancelled
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EInvoiceSubmission {
    pub id: String,
    pub invoice_id: String,
    pub status: EInvoiceState,
    /// MyInvois document UUID, once accepted for processing.
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub validation_errors: Vec<String>,
}

pub async fn get_settings(client: &ApiClient) -> Result<TaxSettings, ApiError> {
    client.get(SETTINGS_PATH).await
}

/// Validated locally first; an invalid payload is never sent.
pub async fn update_settings(
    client: &ApiClient,
    settings: &UpdateTaxSettingsDto,
) -> Result<TaxSettings, ApiError> {
    settings.validate()?;
    client.put(SETTINGS_PATH, settings).await
}

pub async fn submit_einvoice(
    client: &ApiClient,
    submission: &SubmitEInvoiceDto,
) -> Result<EInvoiceSubmission, ApiError> {
    submission.validate()?;
    client
        .post(&format!("{EINVOICE_PATH}/submit"), submission)
        .await
}

pub async fn einvoice_status(
    client: &ApiClient,
    submission_id: &str,
) -> Result<EInvoiceSubmission, ApiError> {
    client
        .get(&format!("{EINVOICE_PATH}/{submission_id}/status"))
        .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::Method;
    use crate::services::testing;

    #[tokio::test]
    async fn malformed_sst_number_is_not_sent() {
        let (client, transport) = testing::client();
        let dto = UpdateTaxSettingsDto {
            sst_registered: true,
            sst_registration_number: Some("W10-1808-3100".into()),
            sst_rate: 10,
            ..Default::default()
        };

        let err = update_settings(&client, &dto).await.unwrap_err();

        match err {
            ApiError::Validation(v) => assert!(v.errors().has_field("sstRegistrationNumber")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn valid_settings_are_put() {
        let (client, transport) = testing::client();
        transport.reply(
            200,
            json!({ "sstRegistered": true, "sstRegistrationNumber": "W10-1808-31000023", "sstRate": 10 }),
        );
        let dto = UpdateTaxSettingsDto {
            sst_registered: true,
            sst_registration_number: Some("W10-1808-31000023".into()),
            sst_rate: 10,
            ..Default::default()
        };

        let saved = update_settings(&client, &dto).await.unwrap();

        assert_eq!(saved.sst_rate, 10);
        assert_eq!(transport.last().method, Method::Put);
    }

    #[tokio::test]
    async fn einvoice_submit_then_poll() {
        let (client, transport) = testing::client();
        transport
            .reply(202, json!({ "id": "s1", "invoiceId": "inv1", "status": "SUBMITTED" }))
            .reply(
                200,
                json!({ "id": "s1", "invoiceId": "inv1", "status": "VALID", "uuid": "F9D4..." }),
            );

        let sub = submit_einvoice(&client, &SubmitEInvoiceDto { invoice_id: "inv1".into() })
            .await
            .unwrap();
        assert!(!sub.status.is_final());

        let polled = einvoice_status(&client, &sub.id).await.unwrap();
        assert!(polled.status.is_final());
        assert!(transport.last().url.ends_with("/tax/einvoice/s1/status"));
    }
}
