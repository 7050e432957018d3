//! Per-organization SST settings.

use sqlx::Row;
use thiserror::Error;

use super::db::{unix_timestamp, LedgerDb};
use super::types::StoredTaxSettings;
use crate::dto::UpdateTaxSettingsDto;
use crate::validation::{Validate, ValidationError};

#[derive(Debug, Error)]
pub enum SettingsError {
    /// The payload was rejected; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("ledger database: {0}")]
    Db(#[from] sqlx::Error),
}

impl LedgerDb {
    pub async fn get_tax_settings(
        &self,
        organization_id: &str,
    ) -> Result<Option<StoredTaxSettings>, SettingsError> {
        let row = sqlx::query(
            r#"
            SELECT organization_id, sst_registered, sst_registration_number, sst_rate,
                   service_tax_rate, einvoice_enabled, tin, updated_at
            FROM tax_settings
            WHERE organization_id = ?1
            "#,
        )
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| StoredTaxSettings {
            organization_id: row.get("organization_id"),
            sst_registered: row.get::<i64, _>("sst_registered") != 0,
            sst_registration_number: row.get("sst_registration_number"),
            sst_rate: row.get::<i64, _>("sst_rate").clamp(0, u8::MAX as i64) as u8,
            service_tax_rate: row.get("service_tax_rate"),
            einvoice_enabled: row.get::<i64, _>("einvoice_enabled") != 0,
            tin: row.get("tin"),
            updated_at: row.get("updated_at"),
        }))
    }

    /// Validate `settings`, then insert or replace the organization's row.
    /// An invalid payload never reaches the database.
    pub async fn update_tax_settings(
        &self,
        organization_id: &str,
        settings: &UpdateTaxSettingsDto,
    ) -> Result<StoredTaxSettings, SettingsError> {
        settings.validate()?;

        let now = unix_timestamp();
        sqlx::query(
            r#"
            INSERT INTO tax_settings (
                organization_id, sst_registered, sst_registration_number, sst_rate,
                service_tax_rate, einvoice_enabled, tin, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT (organization_id) DO UPDATE SET
                sst_registered = excluded.sst_registered,
                sst_registration_number = excluded.sst_registration_number,
                sst_rate = excluded.sst_rate,
                service_tax_rate = excluded.service_tax_rate,
                einvoice_enabled = excluded.einvoice_enabled,
                tin = excluded.tin,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(organization_id)
        .bind(settings.sst_registered as i64)
        .bind(settings.sst_registration_number.as_deref())
        .bind(settings.sst_rate as i64)
        .bind(settings.service_tax_rate)
        .bind(settings.einvoice_enabled as i64)
        .bind(settings.tin.as_deref())
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::info!(organization_id, sst_rate = settings.sst_rate, "tax settings updated");
        Ok(StoredTaxSettings {
            organization_id: organization_id.to_string(),
            sst_registered: settings.sst_registered,
            sst_registration_number: settings.sst_registration_number.clone(),
            sst_rate: settings.sst_rate,
            service_tax_rate: settings.service_tax_rate,
            einvoice_enabled: settings.einvoice_enabled,
            tin: settings.tin.clone(),
            updated_at: now,
        })
    }
}
