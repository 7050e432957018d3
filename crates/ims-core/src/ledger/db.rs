//! Connection, migrations and timestamp helpers. Queries live in `accounts` and `settings`.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Handle to the ledger database, stored at `~/.local/state/ims/ledger.db`.
#[derive(Clone)]
pub struct LedgerDb {
    pub(crate) pool: Pool<Sqlite>,
}

impl LedgerDb {
    /// Open (or create) the default ledger database and run migrations.
    pub async fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("ims")?;
        Self::open_at(xdg_dirs.get_state_home().join("ledger.db")).await
    }

    /// Open (or create) the database at `path`, creating parent dirs as needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        let db = LedgerDb { pool };
        db.migrate().await?;
        tracing::debug!(path = %path.display(), "ledger database ready");
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                organization_id TEXT NOT NULL,
                code TEXT NOT NULL,
                name TEXT NOT NULL,
                account_type TEXT NOT NULL,
                is_system INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                UNIQUE (organization_id, code)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tax_settings (
                organization_id TEXT PRIMARY KEY,
                sst_registered INTEGER NOT NULL DEFAULT 0,
                sst_registration_number TEXT,
                sst_rate INTEGER NOT NULL DEFAULT 0,
                service_tax_rate REAL NOT NULL DEFAULT 0,
                einvoice_enabled INTEGER NOT NULL DEFAULT 0,
                tin TEXT,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
/// In-memory database for tests.
pub(crate) async fn open_memory() -> Result<LedgerDb> {
    // One connection, or the pool may hand back a different empty database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let db = LedgerDb { pool };
    db.migrate().await?;
    Ok(db)
}
