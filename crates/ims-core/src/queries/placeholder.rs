//! Placeholder rows shown in a cached list while a create is pending.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use super::updaters::temp_id;
use crate::services::accounting::Account;
use crate::services::contacts::Contact;
use crate::services::inventory::Item;
use crate::services::purchases::Bill;
use crate::services::sales::Invoice;

/// A row type that can stand in for a record the server has not created yet.
pub trait PendingRow: DeserializeOwned {
    /// Fields the server assigns on create, filled in for the placeholder.
    fn server_fields(_temp_id: &str) -> Map<String, Value> {
        Map::new()
    }
}

impl PendingRow for Item {}
impl PendingRow for Account {}
impl PendingRow for Contact {}

impl PendingRow for Invoice {
    fn server_fields(temp_id: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("invoiceNumber".to_string(), json!(temp_id));
        fields.insert("status".to_string(), json!("DRAFT"));
        fields
    }
}

impl PendingRow for Bill {
    fn server_fields(_temp_id: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("status".to_string(), json!("DRAFT"));
        fields
    }
}

/// Build the placeholder for a create payload. `None` when the result would
/// not read back as `T`, so the cached list is never left unreadable.
pub fn placeholder_row<T: PendingRow>(body: Value) -> Option<Value> {
    let Value::Object(mut fields) = body else {
        return None;
    };
    let id = temp_id();
    for (name, value) in T::server_fields(&id) {
        fields.entry(name).or_insert(value);
    }
    fields.insert("id".to_string(), Value::String(id));
    let row = Value::Object(fields);
    match serde_json::from_value::<T>(row.clone()) {
        Ok(_) => Some(row),
        Err(e) => {
            tracing::debug!("create payload has no placeholder row: {e}");
            None
        }
    }
}
