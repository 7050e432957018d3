//! Chart of accounts: listing and first-run seeding.

use anyhow::{anyhow, Result};
use sqlx::Row;

use super::db::{unix_timestamp, LedgerDb};
use super::defaults::DEFAULT_ACCOUNTS;
use super::types::{LedgerAccount, SeedOutcome};
use crate::dto::AccountType;

impl LedgerDb {
    pub async fn count_accounts(&self, organization_id: &str) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM accounts WHERE organization_id = ?1")
            .bind(organization_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Accounts of one organization ordered by code.
    pub async fn list_accounts(&self, organization_id: &str) -> Result<Vec<LedgerAccount>> {
        let rows = sqlx::query(
            r#"
            SELECT id, organization_id, code, name, account_type, is_system, created_at
            FROM accounts
            WHERE organization_id = ?1
            ORDER BY code ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let type_str: String = row.get("account_type");
            let account_type = AccountType::parse(&type_str)
                .ok_or_else(|| anyhow!("unknown account type {type_str:?} in ledger"))?;
            out.push(LedgerAccount {
                id: row.get("id"),
                organization_id: row.get("organization_id"),
                code: row.get("code"),
                name: row.get("name"),
                account_type,
                is_system: row.get::<i64, _>("is_system") != 0,
                created_at: row.get("created_at"),
            });
        }
        Ok(out)
    }

    /// Insert [`DEFAULT_ACCOUNTS`] for an organization that has no accounts yet.
    ///
    /// If the organization already has any account nothing is written and
    /// `created` is 0. The check and the inserts share one transaction.
    pub async fn seed_chart_of_accounts(&self, organization_id: &str) -> Result<SeedOutcome> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 =
            sqlx::query("SELECT COUNT(*) AS n FROM accounts WHERE organization_id = ?1")
                .bind(organization_id)
                .fetch_one(&mut *tx)
                .await?
                .get("n");
        if existing > 0 {
            tx.commit().await?;
            tracing::debug!(organization_id, existing, "chart of accounts already present, not seeding");
            return Ok(SeedOutcome { created: 0 });
        }

        let now = unix_timestamp();
        for account in DEFAULT_ACCOUNTS {
            sqlx::query(
                r#"
                INSERT INTO accounts (organization_id, code, name, account_type, is_system, created_at)
                VALUES (?1, ?2, ?3, ?4, 1, ?5)
                "#,
            )
            .bind(organization_id)
            .bind(account.code)
            .bind(account.name)
            .bind(account.account_type.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::info!(organization_id, created = DEFAULT_ACCOUNTS.len(), "seeded chart of accounts");
        Ok(SeedOutcome {
            created: DEFAULT_ACCOUNTS.len(),
        })
    }
}
