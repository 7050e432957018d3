//! `ims accounts` – list ledger accounts.

use anyhow::Result;
use ims_core::ledger::LedgerDb;

pub async fn run_accounts(org: &str) -> Result<()> {
    let db = LedgerDb::open_default().await?;
    let accounts = db.list_accounts(org).await?;
    if accounts.is_empty() {
        println!("No accounts for organization {org}. Run `ims seed` first.");
        return Ok(());
    }
    println!("{:<6} {:<10} {}", "CODE", "TYPE", "NAME");
    for a in accounts {
        println!(
            "{:<6} {:<10} {}",
            a.code,
            a.account_type.as_str().to_lowercase(),
            a.name
        );
    }
    Ok(())
}
