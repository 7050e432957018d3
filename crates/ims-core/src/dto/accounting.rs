use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::{rules, FieldErrors, Validate, ValidationError};

/// Top-level ledger classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Asset => "ASSET",
            AccountType::Liability => "LIABILITY",
            AccountType::Equity => "EQUITY",
            AccountType::Revenue => "REVENUE",
            AccountType::Expense => "EXPENSE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ASSET" => Some(AccountType::Asset),
            "LIABILITY" => Some(AccountType::Liability),
            "EQUITY" => Some(AccountType::Equity),
            "REVENUE" => Some(AccountType::Revenue),
            "EXPENSE" => Some(AccountType::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn check_code(errors: &mut FieldErrors, code: &str) {
    let ok = (3..=10).contains(&code.len()) && code.chars().all(|c| c.is_ascii_digit());
    if !ok {
        errors.push("code", "must be 3 to 10 digits");
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountDto {
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for CreateAccountDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        check_code(&mut errors, &self.code);
        rules::text(&mut errors, "name", &self.name, 255);
        rules::optional_text(&mut errors, "description", self.description.as_deref(), 1000);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Validate for UpdateAccountDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            rules::text(&mut errors, "name", name, 255);
        }
        rules::optional_text(&mut errors, "description", self.description.as_deref(), 1000);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalLineDto {
    pub account_id: String,
    #[serde(default)]
    pub debit: f64,
    #[serde(default)]
    pub credit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJournalEntryDto {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub description: String,
    pub lines: Vec<JournalLineDto>,
}

/// Debits and credits must agree to the sen.
const BALANCE_TOLERANCE: f64 = 0.005;

impl Validate for CreateJournalEntryDto {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        rules::iso_date(&mut errors, "date", &self.date);
        rules::optional_text(&mut errors, "reference", self.reference.as_deref(), 100);
        rules::text(&mut errors, "description", &self.description, 500);

        if self.lines.len() < 2 {
            errors.push("lines", "a journal entry needs at least two lines");
        }
        for (i, line) in self.lines.iter().enumerate() {
            let mut line_errors = FieldErrors::new();
            rules::not_blank(&mut line_errors, "accountId", &line.account_id);
            rules::min(&mut line_errors, "debit", line.debit, 0.0);
            rules::min(&mut line_errors, "credit", line.credit, 0.0);
            if (line.debit > 0.0) == (line.credit > 0.0) {
                line_errors.push("amount", "exactly one of debit or credit must be set");
            }
            errors.extend_prefixed(&format!("lines[{i}]"), line_errors);
        }

        let debits: f64 = self.lines.iter().map(|l| l.debit).sum();
        let credits: f64 = self.lines.iter().map(|l| l.credit).sum();
        if (debits - credits).abs() > BALANCE_TOLERANCE {
            errors.push(
                "lines",
                format!("debits ({debits:.2}) must equal credits ({credits:.2})"),
            );
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(account: &str, debit: f64, credit: f64) -> JournalLineDto {
        JournalLineDto {
            account_id: account.to_string(),
            debit,
            credit,
            description: None,
        }
    }

    #[test]
    fn balanced_entry_passes() {
        let dto = CreateJournalEntryDto {
            date: "2024-06-30".to_string(),
            reference: Some("JV-001".to_string()),
            description: "Owner capital injection".to_string(),
            lines: vec![line("1010", 5000.0, 0.0), line("3000", 0.0, 5000.0)],
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn unbalanced_and_double_sided_lines_are_rejected() {
        let dto = CreateJournalEntryDto {
            date: "2024-06-30".to_string(),
            reference: None,
            description: "Bad".to_string(),
            lines: vec![line("1010", 100.0, 100.0), line("3000", 0.0, 50.0)],
        };
        let err = dto.validate().unwrap_err();
        assert!(err.errors().has_field("lines[0].amount"));
        assert!(err.errors().has_field("lines"));
    }

    #[test]
    fn account_code_must_be_digits() {
        let dto = CreateAccountDto {
            code: "AB12".to_string(),
            name: "Petty Cash".to_string(),
            account_type: AccountType::Asset,
            description: None,
        };
        assert!(dto.validate().unwrap_err().errors().has_field("code"));
        assert_eq!(AccountType::parse("EXPENSE"), Some(AccountType::Expense));
        assert_eq!(AccountType::parse("expense"), None);
    }
}
