use std::sync::Arc;

use super::keys;
use crate::api::{ApiClient, ApiError};
use crate::dto::{SubmitEInvoiceDto, UpdateTaxSettingsDto};
use crate::mutation::{Notifier, OptimisticMutation};
use crate::query_cache::{QueryCache, QueryError};
use crate::services::tax::{self, EInvoiceSubmission, TaxSettings};
use crate::validation::Validate;

/// SST settings are a singleton per organization, cached under `["tax", "settings"]`.
#[derive(Clone)]
pub struct TaxQueries {
    client: ApiClient,
    cache: QueryCache,
    notifier: Arc<dyn Notifier>,
    optimistic_messages: bool,
}

impl TaxQueries {
    pub fn new(client: ApiClient, cache: QueryCache, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            cache,
            notifier,
            optimistic_messages: true,
        }
    }

    pub fn optimistic_messages(mut self, enabled: bool) -> Self {
        self.optimistic_messages = enabled;
        self
    }

    pub async fn settings(&self) -> Result<TaxSettings, QueryError<ApiError>> {
        let client = self.client.clone();
        self.cache
            .fetch_query(&keys::tax_settings(), move || {
                let client = client.clone();
                async move { tax::get_settings(&client).await }
            })
            .await
    }

    /// The cached settings are replaced with the submitted values until the server confirms.
    pub async fn update_settings(&self, settings: UpdateTaxSettingsDto) -> Result<TaxSettings, ApiError> {
        settings.validate()?;
        let client = self.client.clone();
        let mut mutation = OptimisticMutation::new(
            self.cache.clone(),
            keys::tax_settings(),
            move |settings: UpdateTaxSettingsDto| {
                let client = client.clone();
                async move { tax::update_settings(&client, &settings).await }
            },
        )
        .with_updater(|current, settings: &UpdateTaxSettingsDto| {
            let next = TaxSettings {
                sst_registered: settings.sst_registered,
                sst_registration_number: settings.sst_registration_number.clone(),
                sst_rate: settings.sst_rate,
                service_tax_rate: settings.service_tax_rate,
                einvoice_enabled: settings.einvoice_enabled,
                tin: settings.tin.clone(),
            };
            serde_json::to_value(next).unwrap_or_else(|_| current.clone())
        })
        .error_message("Failed to update tax settings")
        .notifier(Arc::clone(&self.notifier));
        if self.optimistic_messages {
            mutation = mutation.success_message("Tax settings updated successfully");
        }
        mutation.mutate(settings).await
    }

    /// Submit an invoice to MyInvois and seed the status cache with the response.
    pub async fn submit_einvoice(&self, invoice_id: &str) -> Result<EInvoiceSubmission, ApiError> {
        let dto = SubmitEInvoiceDto {
            invoice_id: invoice_id.to_string(),
        };
        let submission = match tax::submit_einvoice(&self.client, &dto).await {
            Ok(submission) => submission,
            Err(e) => {
                self.notifier.error(&format!("Failed to submit e-Invoice: {e}"));
                return Err(e);
            }
        };
        self.notifier.success("e-Invoice submitted to MyInvois");
        if let Ok(value) = serde_json::to_value(&submission) {
            self.cache
                .set_query_data(&keys::einvoice_submission(&submission.id), value);
        }
        Ok(submission)
    }

    /// Served from cache; invalidate the submission key to poll again.
    pub async fn einvoice_status(&self, submission_id: &str) -> Result<EInvoiceSubmission, QueryError<ApiError>> {
        let client = self.client.clone();
        let id = submission_id.to_string();
        self.cache
            .fetch_query(&keys::einvoice_submission(submission_id), move || {
                let client = client.clone();
                let id = id.clone();
                async move { tax::einvoice_status(&client, &id).await }
            })
            .await
    }
}
