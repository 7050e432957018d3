//! `ims tax show|set` – SST settings in the local ledger, optionally pushed to the backend.

use anyhow::Result;
use ims_core::config::ImsConfig;
use ims_core::dto::UpdateTaxSettingsDto;
use ims_core::ledger::LedgerDb;

use super::{print_notices, queries};
use crate::cli::TaxSetArgs;

pub async fn run_tax_show(org: &str) -> Result<()> {
    let db = LedgerDb::open_default().await?;
    match db.get_tax_settings(org).await? {
        None => println!("No tax settings stored for organization {org}."),
        Some(s) => {
            println!("SST registered:      {}", if s.sst_registered { "yes" } else { "no" });
            println!(
                "Registration number: {}",
                s.sst_registration_number.as_deref().unwrap_or("-")
            );
            println!("Sales tax rate:      {}%", s.sst_rate);
            println!("Service tax rate:    {}%", s.service_tax_rate);
            println!("e-Invoice:           {}", if s.einvoice_enabled { "enabled" } else { "disabled" });
            println!("TIN:                 {}", s.tin.as_deref().unwrap_or("-"));
        }
    }
    Ok(())
}

pub async fn run_tax_set(cfg: &ImsConfig, org: &str, args: TaxSetArgs) -> Result<()> {
    let dto = UpdateTaxSettingsDto {
        sst_registered: args.registered,
        sst_registration_number: args.number,
        sst_rate: args.rate,
        service_tax_rate: args.service_tax_rate,
        einvoice_enabled: args.einvoice,
        tin: args.tin,
    };

    let db = LedgerDb::open_default().await?;
    db.update_tax_settings(org, &dto).await?;
    println!("Tax settings saved for organization {org}.");

    if args.remote {
        let (queries, notifier) = queries(cfg)?;
        let result = queries.tax.update_settings(dto).await;
        print_notices(&notifier);
        result?;
    }
    Ok(())
}
