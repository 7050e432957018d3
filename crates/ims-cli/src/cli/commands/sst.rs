//! `ims check-sst <number>` – offline format check.

use anyhow::{bail, Result};
use ims_core::validation::{rules, FieldErrors};

pub fn run_check_sst(number: &str) -> Result<()> {
    let mut errors = FieldErrors::new();
    rules::sst_registration_number(&mut errors, "number", number);
    if let Some(e) = errors.iter().next() {
        bail!("{number}: {}", e.message);
    }
    println!("{number}: valid SST registration number");
    Ok(())
}
