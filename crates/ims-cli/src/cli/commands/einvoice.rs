//! `ims einvoice submit|status`.

use anyhow::Result;
use ims_core::config::ImsConfig;
use ims_core::services::tax::EInvoiceSubmission;

use super::{print_notices, queries};

fn print_submission(s: &EInvoiceSubmission) {
    println!("Submission: {}", s.id);
    println!("Invoice:    {}", s.invoice_id);
    println!("Status:     {:?}", s.status);
    if let Some(uuid) = &s.uuid {
        println!("UUID:       {uuid}");
    }
    for e in &s.validation_errors {
        println!("  - {e}");
    }
}

pub async fn run_einvoice_submit(cfg: &ImsConfig, invoice_id: &str) -> Result<()> {
    let (queries, notifier) = queries(cfg)?;
    let result = queries.tax.submit_einvoice(invoice_id).await;
    print_notices(&notifier);
    print_submission(&result?);
    Ok(())
}

pub async fn run_einvoice_status(cfg: &ImsConfig, submission_id: &str) -> Result<()> {
    let (queries, _) = queries(cfg)?;
    let submission = queries.tax.einvoice_status(submission_id).await?;
    print_submission(&submission);
    Ok(())
}
