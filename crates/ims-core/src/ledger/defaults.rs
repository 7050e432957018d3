//! Default chart of accounts for a Malaysian SME.

use crate::dto::AccountType;
use crate::dto::AccountType::{Asset, Equity, Expense, Liability, Revenue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultAccount {
    pub code: &'static str,
    pub name: &'static str,
    pub account_type: AccountType,
}

const fn account(code: &'static str, name: &'static str, account_type: AccountType) -> DefaultAccount {
    DefaultAccount {
        code,
        name,
        account_type,
    }
}

pub const DEFAULT_ACCOUNTS: &[DefaultAccount] = &[
    // Assets
    account("1000", "Cash on Hand", Asset),
    account("1010", "Cash at Bank", Asset),
    account("1100", "Accounts Receivable", Asset),
    account("1200", "Inventory", Asset),
    account("1300", "Prepayments and Deposits", Asset),
    account("1400", "SST Receivable", Asset),
    account("1500", "Property, Plant and Equipment", Asset),
    account("1510", "Accumulated Depreciation", Asset),
    // Liabilities
    account("2000", "Accounts Payable", Liability),
    account("2100", "SST Payable", Liability),
    account("2200", "Accrued Expenses", Liability),
    account("2300", "EPF Payable", Liability),
    account("2310", "SOCSO Payable", Liability),
    account("2320", "EIS Payable", Liability),
    account("2330", "PCB (Monthly Tax Deduction) Payable", Liability),
    account("2400", "Income Tax Payable", Liability),
    account("2500", "Bank Borrowings", Liability),
    // Equity
    account("3000", "Share Capital", Equity),
    account("3100", "Retained Earnings", Equity),
    account("3200", "Current Year Earnings", Equity),
    // Revenue
    account("4000", "Sales Revenue", Revenue),
    account("4100", "Service Revenue", Revenue),
    account("4200", "Sales Returns and Allowances", Revenue),
    account("4900", "Other Income", Revenue),
    // Expenses
    account("5000", "Cost of Goods Sold", Expense),
    account("5100", "Purchase Discounts", Expense),
    account("6000", "Salaries and Wages", Expense),
    account("6010", "EPF Contribution", Expense),
    account("6020", "SOCSO Contribution", Expense),
    account("6030", "EIS Contribution", Expense),
    account("6100", "Rental Expense", Expense),
    account("6200", "Utilities", Expense),
    account("6300", "Telephone and Internet", Expense),
    account("6400", "Office Supplies", Expense),
    account("6500", "Transport and Travelling", Expense),
    account("6600", "Advertising and Promotion", Expense),
    account("6700", "Professional Fees", Expense),
    account("6800", "Bank Charges", Expense),
    account("6900", "Depreciation", Expense),
    account("7000", "Income Tax Expense", Expense),
];
