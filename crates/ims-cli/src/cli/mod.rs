//! CLI for the IMS client core.

mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ims_core::config::{self, ImsConfig};

use commands::{
    run_accounts, run_check_sst, run_einvoice_status, run_einvoice_submit, run_items_add,
    run_items_delete, run_items_list, run_login, run_logout, run_seed, run_session, run_tax_set,
    run_tax_show,
};

/// Top-level CLI for the IMS inventory and accounting system.
#[derive(Debug, Parser)]
#[command(name = "ims")]
#[command(about = "IMS: inventory, sales and SST tooling for Malaysian SMEs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Seed the default chart of accounts for an organization (no-op if it has any account).
    Seed {
        /// Organization ID; defaults to `organization_id` from the config.
        #[arg(long)]
        org: Option<String>,
    },

    /// List the organization's ledger accounts.
    Accounts {
        #[arg(long)]
        org: Option<String>,
    },

    /// Show or update SST settings.
    Tax {
        #[command(subcommand)]
        command: TaxCommand,
    },

    /// Check an SST registration number's format (e.g. W10-1808-31000023).
    CheckSst {
        number: String,
    },

    /// Log in to the backend and persist the session.
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Clear the persisted session.
    Logout,

    /// Show the persisted session.
    Session,

    /// Inventory items on the backend.
    Items {
        #[command(subcommand)]
        command: ItemsCommand,
    },

    /// e-Invoice (MyInvois) submissions.
    Einvoice {
        #[command(subcommand)]
        command: EInvoiceCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum TaxCommand {
    /// Show stored SST settings.
    Show {
        #[arg(long)]
        org: Option<String>,
    },
    /// Validate and store SST settings.
    Set(TaxSetArgs),
}

#[derive(Debug, Args)]
pub struct TaxSetArgs {
    #[arg(long)]
    pub org: Option<String>,
    /// The business is SST registered.
    #[arg(long)]
    pub registered: bool,
    /// SST registration number, format A12-3456-78901234.
    #[arg(long, value_name = "NUMBER")]
    pub number: Option<String>,
    /// Sales tax rate in percent (0, 5, 6, 8 or 10).
    #[arg(long, default_value = "0", value_name = "PERCENT")]
    pub rate: u8,
    /// Service tax rate in percent.
    #[arg(long, default_value = "0", value_name = "PERCENT")]
    pub service_tax_rate: f64,
    /// Enable e-Invoice submission (requires --tin).
    #[arg(long)]
    pub einvoice: bool,
    #[arg(long)]
    pub tin: Option<String>,
    /// Also push the settings to the backend.
    #[arg(long)]
    pub remote: bool,
}

#[derive(Debug, Subcommand)]
pub enum ItemsCommand {
    /// List items.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Only items at or below their reorder level.
        #[arg(long)]
        low_stock: bool,
    },
    /// Create an item.
    Add {
        sku: String,
        name: String,
        /// Selling price in MYR.
        #[arg(long)]
        price: f64,
        /// Cost price in MYR.
        #[arg(long, default_value = "0")]
        cost: f64,
        #[arg(long, default_value = "pcs")]
        unit: String,
        #[arg(long, default_value = "0", value_name = "PERCENT")]
        sst_rate: u8,
    },
    /// Delete an item by ID.
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum EInvoiceCommand {
    /// Submit a sales invoice to MyInvois.
    Submit {
        invoice_id: String,
    },
    /// Show a submission's status.
    Status {
        submission_id: String,
    },
}

/// `--org` wins over the configured organization.
fn organization(flag: Option<String>, cfg: &ImsConfig) -> Result<String> {
    flag.or_else(|| cfg.organization_id.clone())
        .context("no organization: pass --org or set organization_id in config.toml")
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Seed { org } => run_seed(&organization(org, &cfg)?).await?,
            CliCommand::Accounts { org } => run_accounts(&organization(org, &cfg)?).await?,
            CliCommand::Tax { command } => match command {
                TaxCommand::Show { org } => run_tax_show(&organization(org, &cfg)?).await?,
                TaxCommand::Set(args) => {
                    let org = organization(args.org.clone(), &cfg)?;
                    run_tax_set(&cfg, &org, args).await?;
                }
            },
            CliCommand::CheckSst { number } => run_check_sst(&number)?,
            CliCommand::Login { email, password } => run_login(&cfg, &email, &password).await?,
            CliCommand::Logout => run_logout(&cfg)?,
            CliCommand::Session => run_session()?,
            CliCommand::Items { command } => match command {
                ItemsCommand::List {
                    search,
                    category,
                    low_stock,
                } => run_items_list(&cfg, search, category, low_stock).await?,
                ItemsCommand::Add {
                    sku,
                    name,
                    price,
                    cost,
                    unit,
                    sst_rate,
                } => run_items_add(&cfg, sku, name, price, cost, unit, sst_rate).await?,
                ItemsCommand::Delete { id } => run_items_delete(&cfg, &id).await?,
            },
            CliCommand::Einvoice { command } => match command {
                EInvoiceCommand::Submit { invoice_id } => run_einvoice_submit(&cfg, &invoice_id).await?,
                EInvoiceCommand::Status { submission_id } => {
                    run_einvoice_status(&cfg, &submission_id).await?
                }
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
