//! `ims seed` – install the default chart of accounts.

use anyhow::Result;
use ims_core::ledger::LedgerDb;

pub async fn run_seed(org: &str) -> Result<()> {
    let db = LedgerDb::open_default().await?;
    let outcome = db.seed_chart_of_accounts(org).await?;
    if outcome.created == 0 {
        println!("Organization {org} already has accounts; nothing seeded.");
    } else {
        println!("Seeded {} accounts for organization {org}.", outcome.created);
    }
    Ok(())
}
