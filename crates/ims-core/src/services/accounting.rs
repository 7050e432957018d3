//! Chart of accounts and journal entries.

use serde::{Deserialize, Serialize};

use super::{NoFilter, Resource};
use crate::api::{ApiClient, ApiError};
use crate::dto::{AccountType, CreateJournalEntryDto, JournalLineDto};
use crate::validation::Validate;

pub const ACCOUNTS_PATH: &str = "accounting/accounts";
pub const JOURNAL_ENTRIES_PATH: &str = "accounting/journal-entries";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub is_system: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    #[serde(default)]
    pub entry_number: Option<String>,
    pub date: String,
    #[serde(default)]
    pub reference: Option<String>,
    pub description: String,
    #[serde(default)]
    pub lines: Vec<JournalLineDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

pub fn accounts(client: &ApiClient) -> Resource<Account> {
    Resource::new(client.clone(), ACCOUNTS_PATH)
}

/// Journal entries are append-only: listed and created, never edited.
pub async fn list_journal_entries(
    client: &ApiClient,
    filter: &JournalFilter,
) -> Result<Vec<JournalEntry>, ApiError> {
    Resource::<JournalEntry>::new(client.clone(), JOURNAL_ENTRIES_PATH)
        .list(filter)
        .await
}

pub async fn create_journal_entry(
    client: &ApiClient,
    entry: &CreateJournalEntryDto,
) -> Result<JournalEntry, ApiError> {
    entry.validate()?;
    client.post(JOURNAL_ENTRIES_PATH, entry).await
}

pub async fn list_accounts(client: &ApiClient) -> Result<Vec<Account>, ApiError> {
    accounts(client).list(&NoFilter::default()).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::testing;

    #[tokio::test]
    async fn unbalanced_entry_never_leaves_the_client() {
        let (client, transport) = testing::client();
        let entry = CreateJournalEntryDto {
            date: "2026-04-01".into(),
            reference: None,
            description: "Owner capital".into(),
            lines: vec![
                JournalLineDto {
                    account_id: "1010".into(),
                    debit: 1000.0,
                    credit: 0.0,
                    description: None,
                },
                JournalLineDto {
                    account_id: "3000".into(),
                    debit: 0.0,
                    credit: 900.0,
                    description: None,
                },
            ],
        };

        let err = create_journal_entry(&client, &entry).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn accounts_list_without_query_string() {
        let (client, transport) = testing::client();
        transport.reply(
            200,
            json!([{ "id": "a1", "code": "2100", "name": "SST Payable", "type": "LIABILITY", "isSystem": true }]),
        );

        let rows = list_accounts(&client).await.unwrap();

        assert_eq!(rows[0].account_type, AccountType::Liability);
        assert_eq!(transport.last().url, "http://ims.test/api/accounting/accounts");
    }
}
