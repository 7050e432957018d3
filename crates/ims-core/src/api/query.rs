//! List filters to query-string pairs.

use serde::Serialize;
use serde_json::Value;

/// Flatten a filter struct into `(name, value)` pairs.
///
/// `null` fields are skipped, strings are used as-is, arrays repeat the name,
/// and other scalars use their JSON text. Non-object filters yield no pairs.
pub fn query_pairs<F: Serialize + ?Sized>(filter: &F) -> Result<Vec<(String, String)>, serde_json::Error> {
    let Value::Object(map) = serde_json::to_value(filter)? else {
        return Ok(Vec::new());
    };
    let mut pairs = Vec::with_capacity(map.len());
    for (name, value) in map {
        match value {
            Value::Null => {}
            Value::Array(values) => {
                for v in values {
                    if let Some(s) = scalar(v) {
                        pairs.push((name.clone(), s));
                    }
                }
            }
            other => {
                if let Some(s) = scalar(other) {
                    pairs.push((name, s));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Filter {
        search: Option<String>,
        page: Option<u32>,
        is_active: Option<bool>,
        status: Vec<&'static str>,
    }

    #[test]
    fn skips_nulls_and_expands_arrays() {
        let f = Filter {
            search: Some("kopi o".to_string()),
            page: None,
            is_active: Some(true),
            status: vec!["DRAFT", "SENT"],
        };
        let pairs = query_pairs(&f).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("isActive".to_string(), "true".to_string()),
                ("search".to_string(), "kopi o".to_string()),
                ("status".to_string(), "DRAFT".to_string()),
                ("status".to_string(), "SENT".to_string()),
            ]
        );
    }

    #[test]
    fn unit_filter_has_no_pairs() {
        assert!(query_pairs(&()).unwrap().is_empty());
    }
}
