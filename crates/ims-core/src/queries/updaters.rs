//! Pure list transforms applied to cached list values before the server answers.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

static NEXT_TEMP_ID: AtomicU64 = AtomicU64::new(1);

/// Placeholder id for a row the server hasn't assigned one to yet.
pub fn temp_id() -> String {
    format!("optimistic-{}", NEXT_TEMP_ID.fetch_add(1, Ordering::Relaxed))
}

pub fn is_temp_id(id: &str) -> bool {
    id.starts_with("optimistic-")
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

/// Append `row` to a cached list, giving it a temporary id if it has none.
/// Non-list values are returned unchanged.
pub fn append_row(list: &Value, mut row: Value) -> Value {
    let Value::Array(rows) = list else {
        return list.clone();
    };
    if let Value::Object(fields) = &mut row {
        if !fields.contains_key("id") {
            fields.insert("id".to_string(), Value::String(temp_id()));
        }
    }
    let mut rows = rows.clone();
    rows.push(row);
    Value::Array(rows)
}

/// Overlay the fields of `patch` onto the row with `id`. `null` patch fields are ignored.
pub fn merge_row(list: &Value, id: &str, patch: &Value) -> Value {
    let (Value::Array(rows), Value::Object(patch)) = (list, patch) else {
        return list.clone();
    };
    let rows = rows
        .iter()
        .map(|row| match row {
            Value::Object(fields) if row_id(row) == Some(id) => {
                let mut fields = fields.clone();
                for (name, value) in patch.iter().filter(|(_, v)| !v.is_null()) {
                    fields.insert(name.clone(), value.clone());
                }
                Value::Object(fields)
            }
            other => other.clone(),
        })
        .collect();
    Value::Array(rows)
}

pub fn remove_row(list: &Value, id: &str) -> Value {
    match list {
        Value::Array(rows) => Value::Array(
            rows.iter()
                .filter(|row| row_id(row) != Some(id))
                .cloned()
                .collect(),
        ),
        other => other.clone(),
    }
}
