//! Integration test: chart-of-accounts seeding and tax settings on an on-disk ledger.

use ims_core::dto::UpdateTaxSettingsDto;
use ims_core::ledger::{LedgerDb, SettingsError, DEFAULT_ACCOUNTS};
use tempfile::tempdir;

#[tokio::test]
async fn seed_survives_reopen_and_is_not_repeated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state dir").join("ledger.db");

    let db = LedgerDb::open_at(&path).await.unwrap();
    let first = db.seed_chart_of_accounts("org-kl").await.unwrap();
    assert_eq!(first.created, DEFAULT_ACCOUNTS.len());
    drop(db);

    let reopened = LedgerDb::open_at(&path).await.unwrap();
    let again = reopened.seed_chart_of_accounts("org-kl").await.unwrap();
    assert_eq!(again.created, 0);
    assert_eq!(
        reopened.list_accounts("org-kl").await.unwrap().len(),
        DEFAULT_ACCOUNTS.len()
    );
}

#[tokio::test]
async fn rejected_settings_are_not_persisted() {
    let dir = tempdir().unwrap();
    let db = LedgerDb::open_at(dir.path().join("ledger.db")).await.unwrap();

    let dto = UpdateTaxSettingsDto {
        sst_registered: true,
        sst_registration_number: Some("w10-1808-31000023".to_string()),
        sst_rate: 10,
        ..Default::default()
    };
    let err = db.update_tax_settings("org-kl", &dto).await.unwrap_err();

    assert!(matches!(err, SettingsError::Validation(_)));
    assert!(db.get_tax_settings("org-kl").await.unwrap().is_none());
}
