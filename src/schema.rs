//! Dynamic column discovery over a fetched batch of records.
//!
//! The table offers every field seen anywhere in the batch as an optional
//! column, except the structural ones that make no sense as columns.

use crate::models::ChatRecord;
use std::collections::BTreeSet;

/// Fields excluded from discovery: they are structural, not displayable.
pub const EXCLUDED_FIELDS: [&str; 2] = ["history", "_id"];

/// Union of field names across the batch, minus the exclusions.
///
/// Order-insensitive; an empty batch yields an empty set. The result only
/// drives which columns the user may toggle on - no type inference.
pub fn discover_columns(records: &[ChatRecord]) -> BTreeSet<String> {
    records
        .iter()
        .flat_map(|record| record.column_names())
        .filter(|name| !EXCLUDED_FIELDS.contains(&name.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<ChatRecord> {
        serde_json::from_value(value).expect("records should deserialize")
    }

    #[test]
    fn test_discovery_unions_keys_minus_exclusions() {
        let batch = records(json!([
            { "a": 1, "history": [], "_id": "1" },
            { "b": 2 }
        ]));
        let columns = discover_columns(&batch);
        let expected: BTreeSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(columns, expected);
    }

    #[test]
    fn test_discovery_is_order_insensitive() {
        let forward = records(json!([{ "a": 1 }, { "b": 2, "mode": "chat" }]));
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(discover_columns(&forward), discover_columns(&reversed));
    }

    #[test]
    fn test_discovery_empty_batch() {
        assert!(discover_columns(&[]).is_empty());
    }

    #[test]
    fn test_discovery_includes_known_fields() {
        let batch = records(json!([
            { "agent_id": "a", "timestamp": "2024-01-01", "custom": true }
        ]));
        let columns = discover_columns(&batch);
        assert!(columns.contains("agent_id"));
        assert!(columns.contains("timestamp"));
        assert!(columns.contains("custom"));
    }
}
